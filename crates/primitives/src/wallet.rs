//! A `Wallet` is a wrapper around an ethers wallet owning the smart account
use crate::UserOperationSigned;
use ethers::{
    prelude::k256::ecdsa::SigningKey,
    signers::{coins_bip39::English, LocalWallet, MnemonicBuilder, Signer},
    types::Address,
};
use expanded_pathbuf::ExpandedPathBuf;

const DERIVATION_PATH: &str = "m/44'/60'/0'/0/0";

/// Wrapper around ethers wallet
#[derive(Clone, Debug)]
pub struct Wallet {
    /// Signing key of the wallet (owner of the smart account)
    pub signer: ethers::signers::Wallet<SigningKey>,
}

impl Wallet {
    /// Create a new wallet from the given file containing the mnemonic phrase
    ///
    /// # Arguments
    /// * `path` - The path to the file where the mnemonic phrase is stored
    /// * `chain_id` - The chain id of the blockchain network to be used
    ///
    /// # Returns
    /// * `Self` - A new `Wallet` instance
    pub fn from_file(path: ExpandedPathBuf, chain_id: u64) -> eyre::Result<Self> {
        let wallet = MnemonicBuilder::<English>::default()
            .phrase(path.to_path_buf())
            .derivation_path(DERIVATION_PATH)?
            .build()?;

        Ok(Self { signer: wallet.with_chain_id(chain_id) })
    }

    /// Create a new wallet from the given mnemonic phrase
    ///
    /// # Arguments
    /// * `phrase` - The mnemonic phrase
    /// * `chain_id` - The chain id of the blockchain network to be used
    ///
    /// # Returns
    /// * `Self` - A new `Wallet` instance
    pub fn from_phrase(phrase: &str, chain_id: u64) -> eyre::Result<Self> {
        let wallet = MnemonicBuilder::<English>::default()
            .phrase(phrase)
            .derivation_path(DERIVATION_PATH)?
            .build()?;

        Ok(Self { signer: wallet.with_chain_id(chain_id) })
    }

    /// Create a new wallet from a hex encoded private key (with or without `0x`)
    pub fn from_key(key: &str, chain_id: u64) -> eyre::Result<Self> {
        let wallet = key.trim_start_matches("0x").parse::<LocalWallet>()?;
        Ok(Self { signer: wallet.with_chain_id(chain_id) })
    }

    /// Address of the owner
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Signs the user operation
    ///
    /// # Arguments
    /// * `uo` - The [UserOperation](UserOperationSigned) to be signed
    /// * `ep` - The entry point contract address
    /// * `chain_id` - The chain id of the blockchain network to be used
    ///
    /// # Returns
    /// * `UserOperationSigned` - The signed [UserOperation](UserOperationSigned)
    pub async fn sign_user_operation(
        &self,
        uo: &UserOperationSigned,
        ep: &Address,
        chain_id: u64,
    ) -> eyre::Result<UserOperationSigned> {
        sign_user_operation(&self.signer, uo, ep, chain_id).await
    }
}

/// Signs the user operation hash as an EIP-191 message, which is what the SimpleAccount (entry
/// point v0.7) verifies
pub async fn sign_user_operation<S: Signer>(
    signer: &S,
    uo: &UserOperationSigned,
    ep: &Address,
    chain_id: u64,
) -> eyre::Result<UserOperationSigned> {
    let h = uo.hash(ep, chain_id);
    let sig = signer
        .sign_message(h.0.as_bytes())
        .await
        .map_err(|err| eyre::eyre!("Failed to sign user operation {h}: {err}"))?;
    Ok(uo.clone().signature(sig.to_vec().into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::entry_point::ADDRESS;
    use ethers::types::{RecoveryMessage, Signature};

    const KEY_PHRASE: &str = "test test test test test test test test test test test junk";

    #[tokio::test]
    async fn sign_user_operation_recovers_owner() {
        let wallet = Wallet::from_phrase(KEY_PHRASE, 84532).unwrap();
        let ep: Address = ADDRESS.parse().unwrap();
        let uo = UserOperationSigned::default().sender(Address::repeat_byte(7)).nonce(3.into());

        let signed = wallet.sign_user_operation(&uo, &ep, 84532).await.unwrap();
        assert_eq!(signed.signature.len(), 65);

        let signature = Signature::try_from(signed.signature.as_ref()).unwrap();
        let hash = uo.hash(&ep, 84532);
        let recovered =
            signature.recover(RecoveryMessage::Data(hash.0.as_bytes().to_vec())).unwrap();
        assert_eq!(recovered, wallet.address());
    }

    #[test]
    fn wallet_from_key() {
        let key = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
        let from_key = Wallet::from_key(key, 1).unwrap();
        let from_phrase = Wallet::from_phrase(KEY_PHRASE, 1).unwrap();
        assert_eq!(from_key.address(), from_phrase.address());
    }
}
