//! Smart account session lifecycle: from a connected owner signer to a ready-to-transact account
use crate::{
    backend::{AccountBackend, UserOperationClient},
    error::SmartAccountError,
};
use ethers::types::Address;
use l2_primitives::{
    constants::entry_point, ClientConfig, EndpointSettings, UserOperationHash,
    UserOperationReceipt, UserOperationRequest,
};
use parking_lot::Mutex;
use std::{fmt, str::FromStr, sync::Arc};
use tracing::{debug, info, warn};

/// The smart account bound to the current owner
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SmartAccountDescriptor {
    /// Counterfactual address (valid before deployment)
    pub address: Address,
    pub entry_point: Address,
    pub entry_point_version: &'static str,
    /// Whether bytecode exists at `address`
    pub is_deployed: bool,
}

/// Session state
///
/// Exactly one state holds at a time. The error states carry a human-readable message.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum SessionState {
    /// No owner connected
    #[default]
    Uninitialized,
    Initializing,
    Ready(SmartAccountDescriptor),
    /// Endpoint settings missing or placeholders (terminal until the configuration changes)
    ConfigError(String),
    /// Initialization failed (retry by reconnecting)
    InitError(String),
}

impl SessionState {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    pub fn account(&self) -> Option<&SmartAccountDescriptor> {
        match self {
            Self::Ready(account) => Some(account),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::ConfigError(message) | Self::InitError(message) => Some(message),
            _ => None,
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uninitialized => write!(f, "uninitialized"),
            Self::Initializing => write!(f, "initializing"),
            Self::Ready(account) => write!(f, "ready ({:?})", account.address),
            Self::ConfigError(message) => write!(f, "configuration error: {message}"),
            Self::InitError(message) => write!(f, "initialization error: {message}"),
        }
    }
}

/// Read-only view of the session for consumers
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionView {
    pub address: Option<Address>,
    pub is_deployed: bool,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl From<&SessionState> for SessionView {
    fn from(state: &SessionState) -> Self {
        Self {
            address: state.account().map(|account| account.address),
            is_deployed: state.account().map(|account| account.is_deployed).unwrap_or_default(),
            is_loading: matches!(state, SessionState::Initializing),
            error: state.error().map(str::to_string),
        }
    }
}

/// A user operation accepted by the bundler
///
/// Keeps the client that submitted it, so waiting for the receipt works even if the session was
/// torn down in the meantime.
pub struct UserOperationHandle<C> {
    hash: UserOperationHash,
    generation: u64,
    client: Arc<C>,
}

impl<C> UserOperationHandle<C> {
    pub fn hash(&self) -> UserOperationHash {
        self.hash
    }
}

impl<C> fmt::Debug for UserOperationHandle<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserOperationHandle")
            .field("hash", &self.hash)
            .field("generation", &self.generation)
            .finish()
    }
}

struct Inner<C> {
    /// Bumped on every connect/disconnect; completions of an older generation are dropped
    generation: u64,
    state: SessionState,
    client: Option<Arc<C>>,
}

/// Owns the smart account session for a single owner at a time
pub struct SmartAccountManager<B: AccountBackend> {
    backend: Arc<B>,
    settings: EndpointSettings,
    inner: Mutex<Inner<B::Client>>,
}

impl<B: AccountBackend> SmartAccountManager<B> {
    /// Create a new session manager
    ///
    /// # Arguments
    /// * `backend` - Network collaborators (account derivation, client construction, code lookup)
    /// * `settings` - Endpoint settings, validated on every connect
    ///
    /// # Returns
    /// * `Self` - A new manager in the `Uninitialized` state
    pub fn new(backend: Arc<B>, settings: EndpointSettings) -> Self {
        Self {
            backend,
            settings,
            inner: Mutex::new(Inner {
                generation: 0,
                state: SessionState::Uninitialized,
                client: None,
            }),
        }
    }

    pub fn settings(&self) -> &EndpointSettings {
        &self.settings
    }

    /// Current session state
    pub fn state(&self) -> SessionState {
        self.inner.lock().state.clone()
    }

    /// Read-only view of the current session
    pub fn view(&self) -> SessionView {
        SessionView::from(&self.inner.lock().state)
    }

    /// Reacts to the wallet session: `Some` connects (or re-connects) the owner, `None` tears the
    /// session down
    pub async fn set_signer(&self, signer: Option<B::Signer>) -> SessionState {
        match signer {
            Some(signer) => self.connect(signer).await,
            None => {
                self.disconnect();
                SessionState::Uninitialized
            }
        }
    }

    /// Validated endpoints for a session, or the configuration error that blocks it
    pub fn client_config(&self) -> Result<ClientConfig, SmartAccountError> {
        Ok(ClientConfig::try_from(&self.settings)?)
    }

    /// Brings the smart account session up for `signer`
    ///
    /// The session passes through `Initializing` before the endpoints are validated, so a
    /// configuration error is reached from there without any network call.
    ///
    /// Any previous session is discarded. If the session is torn down (or re-connected) while
    /// this call is in flight, its outcome is dropped and the newer state is returned instead.
    pub async fn connect(&self, signer: B::Signer) -> SessionState {
        let generation = {
            let mut inner = self.inner.lock();
            inner.generation += 1;
            inner.client = None;
            inner.state = SessionState::Initializing;
            inner.generation
        };

        let config = match self.client_config() {
            Ok(config) => config,
            Err(err) => {
                warn!("Smart account configuration error: {err}");
                return self.complete(generation, SessionState::ConfigError(err.to_string()), None);
            }
        };

        info!(
            "Initializing smart account (bundler: {}, paymaster: {})",
            config.bundler_url, config.paymaster
        );

        match self.initialize(&config, signer).await {
            Ok((account, client)) => {
                info!(
                    "Smart account {:?} ready (deployed: {})",
                    account.address, account.is_deployed
                );
                self.complete(generation, SessionState::Ready(account), Some(Arc::new(client)))
            }
            Err(err) => {
                warn!("Smart account initialization failed: {err}");
                self.complete(generation, SessionState::InitError(err.to_string()), None)
            }
        }
    }

    async fn initialize(
        &self,
        config: &ClientConfig,
        signer: B::Signer,
    ) -> Result<(SmartAccountDescriptor, B::Client), SmartAccountError> {
        let address = self
            .backend
            .derive_account(config, &signer)
            .await
            .map_err(SmartAccountError::initialization)?;
        debug!("Derived smart account address {address:?}");

        let client = self
            .backend
            .create_client(config, signer, address)
            .await
            .map_err(SmartAccountError::initialization)?;

        let code = self
            .backend
            .get_code(config, address)
            .await
            .map_err(SmartAccountError::initialization)?;

        let entry_point = Address::from_str(entry_point::ADDRESS).map_err(|err| {
            SmartAccountError::Initialization { message: format!("Invalid entry point: {err}") }
        })?;

        Ok((
            SmartAccountDescriptor {
                address,
                entry_point,
                entry_point_version: entry_point::VERSION,
                is_deployed: !code.is_empty(),
            },
            client,
        ))
    }

    /// Applies the outcome of an initialization unless it went stale
    fn complete(
        &self,
        generation: u64,
        state: SessionState,
        client: Option<Arc<B::Client>>,
    ) -> SessionState {
        let mut inner = self.inner.lock();
        if inner.generation != generation {
            debug!("Dropping stale smart account initialization result: {state}");
            return inner.state.clone();
        }
        inner.state = state;
        inner.client = client;
        inner.state.clone()
    }

    /// Tears the session down (owner disconnected)
    pub fn disconnect(&self) {
        let mut inner = self.inner.lock();
        inner.generation += 1;
        inner.client = None;
        if inner.state != SessionState::Uninitialized {
            info!("Smart account session closed");
        }
        inner.state = SessionState::Uninitialized;
    }

    /// Submits a single call as a user operation
    ///
    /// Fails with [NotInitialized](SmartAccountError::NotInitialized) unless the session is
    /// ready; nothing is sent to the network in that case.
    pub async fn submit_operation(
        &self,
        request: UserOperationRequest,
    ) -> Result<UserOperationHandle<B::Client>, SmartAccountError> {
        let (client, generation) = {
            let inner = self.inner.lock();
            match (&inner.state, &inner.client) {
                (SessionState::Ready(_), Some(client)) => (client.clone(), inner.generation),
                _ => return Err(SmartAccountError::NotInitialized),
            }
        };

        debug!(
            "Submitting user operation calling {:?} with value {}",
            request.target, request.value
        );

        let hash = client
            .send_user_operation(vec![request.into()])
            .await
            .map_err(SmartAccountError::submission)?;

        info!("User operation {hash} accepted by the bundler");

        Ok(UserOperationHandle { hash, generation, client })
    }

    /// Waits for the receipt of a submitted user operation
    ///
    /// The receipt is returned as the bundler reported it, including its success flag. Once any
    /// receipt arrives the account is known to be deployed, which is recorded in the session
    /// unless it has been replaced since the submission.
    pub async fn wait_for_receipt(
        &self,
        handle: &UserOperationHandle<B::Client>,
    ) -> Result<UserOperationReceipt, SmartAccountError> {
        let receipt = handle
            .client
            .wait_for_user_operation_receipt(handle.hash)
            .await
            .map_err(SmartAccountError::receipt)?;

        let mut inner = self.inner.lock();
        if inner.generation == handle.generation {
            if let SessionState::Ready(account) = &mut inner.state {
                if !account.is_deployed {
                    info!("Smart account {:?} deployed", account.address);
                    account.is_deployed = true;
                }
            }
        }

        Ok(receipt)
    }
}
