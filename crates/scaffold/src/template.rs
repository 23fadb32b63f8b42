//! Project templates and their rendering
use crate::error::ScaffoldError;
use include_dir::{include_dir, Dir, DirEntry};
use l2_primitives::Network;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use strum_macros::{Display, EnumIter, EnumString, EnumVariantNames};
use tracing::{debug, info, warn};

static REACT_TEMPLATE: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/templates/react");
static AA_BASE_TEMPLATE: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/templates/aa-base");

/// Project template
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumIter,
    EnumString,
    EnumVariantNames,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "kebab_case")]
#[serde(rename_all = "kebab-case")]
pub enum Template {
    /// Static page without a build step
    #[default]
    Javascript,
    /// Vite + React + wagmi + RainbowKit
    React,
    /// React frontend with an ERC-4337 smart account and gasless transactions
    AaBase,
}

impl Template {
    fn tree(&self) -> Option<&'static Dir<'static>> {
        match self {
            Template::Javascript => None,
            Template::React => Some(&REACT_TEMPLATE),
            Template::AaBase => Some(&AA_BASE_TEMPLATE),
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Template::Javascript => "Plain HTML page",
            Template::React => "React + wagmi + RainbowKit",
            Template::AaBase => "React + ERC-4337 smart account (gasless transactions)",
        }
    }

    /// Commands to run inside the new project
    pub fn next_steps(&self) -> Vec<String> {
        match self {
            Template::Javascript => vec!["Open index.html in browser".into()],
            Template::React => vec!["npm install".into(), "npm run dev".into()],
            Template::AaBase => vec![
                "cd frontend".into(),
                "cp .env.example .env (set VITE_BUNDLER_URL and VITE_PAYMASTER_URL)".into(),
                "npm install".into(),
                "npm run dev".into(),
            ],
        }
    }
}

/// What to scaffold and where
#[derive(Clone, Debug)]
pub struct ScaffoldOptions {
    pub name: String,
    pub network: Network,
    pub template: Template,
    /// Directory the project directory is created in
    pub parent: PathBuf,
}

/// Outcome of [scaffold](scaffold)
#[derive(Clone, Debug)]
pub struct ScaffoldReport {
    pub root: PathBuf,
    /// Written files, relative to `root`
    pub files: Vec<PathBuf>,
    pub next_steps: Vec<String>,
}

/// Values substituted for the `{{...}}` placeholders of the template files
fn variables(name: &str, network: Network) -> [(&'static str, String); 8] {
    [
        ("{{project_name}}", name.to_string()),
        ("{{network_import}}", network.wagmi_import().to_string()),
        ("{{network_name}}", network.wagmi_import().to_string()),
        ("{{network_display}}", network.display_name().to_string()),
        ("{{chain_id}}", network.chain_id().to_string()),
        ("{{rpc_url}}", network.rpc_url().to_string()),
        ("{{explorer_url}}", network.explorer_url().to_string()),
        ("{{docs_url}}", network.docs_url().to_string()),
    ]
}

fn render(contents: &str, variables: &[(&'static str, String)]) -> String {
    variables
        .iter()
        .fold(contents.to_string(), |acc, (placeholder, value)| acc.replace(placeholder, value))
}

fn validate_name(name: &str) -> Result<(), ScaffoldError> {
    let name = name.trim();
    if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
        return Err(ScaffoldError::InvalidProjectName(name.to_string()));
    }
    Ok(())
}

fn write_file(root: &Path, relative: &Path, contents: &str) -> Result<(), ScaffoldError> {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(ScaffoldError::io(parent))?;
    }
    fs::write(&path, contents).map_err(ScaffoldError::io(&path))?;
    debug!("Wrote {}", path.display());
    Ok(())
}

fn extract(
    dir: &Dir<'_>,
    root: &Path,
    variables: &[(&'static str, String)],
    files: &mut Vec<PathBuf>,
) -> Result<(), ScaffoldError> {
    for entry in dir.entries() {
        match entry {
            DirEntry::Dir(dir) => extract(dir, root, variables, files)?,
            DirEntry::File(file) => {
                let contents = file
                    .contents_utf8()
                    .ok_or_else(|| ScaffoldError::NonUtf8Template(file.path().to_path_buf()))?;
                write_file(root, file.path(), &render(contents, variables))?;
                files.push(file.path().to_path_buf());
            }
        }
    }
    Ok(())
}

fn javascript_files(name: &str, network: Network) -> Vec<(PathBuf, String)> {
    let html = format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<title>{name}</title>\n</head>\n<body>\n<h1>{name}</h1>\n\
         <p>Network: {}</p>\n<p>Chain ID: {}</p>\n<p><a href=\"{}\">Explorer</a></p>\n</body>\n</html>\n",
        network.display_name(),
        network.chain_id(),
        network.explorer_url(),
    );
    let readme = format!(
        "# {name}\n\nL2 app on {}\n\nChain: {}\nRPC: {}\nExplorer: {}\nDocs: {}\n",
        network.display_name(),
        network.chain_id(),
        network.rpc_url(),
        network.explorer_url(),
        network.docs_url(),
    );
    vec![(PathBuf::from("index.html"), html), (PathBuf::from("README.md"), readme)]
}

fn write_project(options: &ScaffoldOptions, root: &Path) -> Result<Vec<PathBuf>, ScaffoldError> {
    let mut files = vec![];
    match options.template.tree() {
        Some(tree) => {
            let variables = variables(&options.name, options.network);
            extract(tree, root, &variables, &mut files)?;
        }
        None => {
            for (relative, contents) in javascript_files(&options.name, options.network) {
                write_file(root, &relative, &contents)?;
                files.push(relative);
            }
        }
    }
    Ok(files)
}

/// Creates a new project directory `parent/name` from the template
///
/// Fails if the directory already exists. If writing fails halfway, the partially written
/// directory is removed.
pub fn scaffold(options: &ScaffoldOptions) -> Result<ScaffoldReport, ScaffoldError> {
    validate_name(&options.name)?;

    let root = options.parent.join(options.name.trim());
    if root.exists() {
        return Err(ScaffoldError::DirectoryExists(root));
    }

    info!(
        "Creating {} project {} on {}",
        options.template,
        options.name,
        options.network.display_name()
    );
    fs::create_dir_all(&root).map_err(ScaffoldError::io(&root))?;

    match write_project(options, &root) {
        Ok(files) => {
            Ok(ScaffoldReport { root, files, next_steps: options.template.next_steps() })
        }
        Err(err) => {
            if let Err(cleanup) = fs::remove_dir_all(&root) {
                warn!("Failed to remove {}: {cleanup}", root.display());
            }
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use tempfile::TempDir;

    fn options(parent: &Path, template: Template, network: Network) -> ScaffoldOptions {
        ScaffoldOptions { name: "my-app".into(), network, template, parent: parent.to_path_buf() }
    }

    #[test]
    fn template_names() {
        assert_eq!(Template::from_str("aa-base").unwrap(), Template::AaBase);
        assert_eq!(Template::React.to_string(), "react");
        assert_eq!(Template::default(), Template::Javascript);
        assert!(Template::from_str("nextjs").is_err());
    }

    #[test]
    fn render_placeholders() {
        let rendered = render(
            "import { {{network_import}} } from 'wagmi/chains' // {{chain_id}} {{project_name}}",
            &variables("demo", Network::BaseSepolia),
        );
        assert_eq!(rendered, "import { baseSepolia } from 'wagmi/chains' // 84532 demo");
    }

    #[test]
    fn scaffold_javascript() {
        let dir = TempDir::new().unwrap();
        let report =
            scaffold(&options(dir.path(), Template::Javascript, Network::Optimism)).unwrap();

        assert_eq!(report.root, dir.path().join("my-app"));
        assert_eq!(report.files.len(), 2);
        let html = fs::read_to_string(report.root.join("index.html")).unwrap();
        assert!(html.contains("<title>my-app</title>"));
        assert!(html.contains("Chain ID: 10"));
        let readme = fs::read_to_string(report.root.join("README.md")).unwrap();
        assert!(readme.contains("https://mainnet.optimism.io"));
        assert_eq!(report.next_steps, vec!["Open index.html in browser".to_string()]);
    }

    #[test]
    fn scaffold_react() {
        let dir = TempDir::new().unwrap();
        let report = scaffold(&options(dir.path(), Template::React, Network::Base)).unwrap();

        let wagmi = fs::read_to_string(report.root.join("src/wagmi.js")).unwrap();
        assert!(wagmi.contains("import { base } from 'wagmi/chains'"));
        assert!(wagmi.contains("appName: 'my-app'"));
        assert!(!wagmi.contains("{{"));
        assert!(report.root.join("package.json").exists());
    }

    #[test]
    fn scaffold_aa_base() {
        let dir = TempDir::new().unwrap();
        let report =
            scaffold(&options(dir.path(), Template::AaBase, Network::BaseSepolia)).unwrap();

        let env = fs::read_to_string(report.root.join("frontend/.env.example")).unwrap();
        assert!(env.contains("VITE_BUNDLER_URL="));
        assert!(env.contains("84532"));
        assert!(report.root.join("frontend/src/hooks/useSmartAccount.js").exists());
        assert!(report.files.iter().all(|file| report.root.join(file).is_file()));
    }

    #[test]
    fn existing_directory() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("my-app")).unwrap();

        let err = scaffold(&options(dir.path(), Template::React, Network::Base)).unwrap_err();
        assert!(matches!(err, ScaffoldError::DirectoryExists(_)));
    }

    #[test]
    fn invalid_name() {
        let dir = TempDir::new().unwrap();
        for name in ["", "  ", "..", "a/b"] {
            let options = ScaffoldOptions {
                name: name.into(),
                ..options(dir.path(), Template::React, Network::Base)
            };
            assert!(matches!(scaffold(&options), Err(ScaffoldError::InvalidProjectName(_))));
        }
    }
}
