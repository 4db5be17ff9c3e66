//! Shell launch configuration and child environment

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::session::Dimensions;

/// Shell used when `$SHELL` is unset or empty.
pub const FALLBACK_SHELL: &str = "/bin/sh";

/// Variables that make CLI tools believe they run under CI.
///
/// Spinner and prompt libraries turn off cursor-based redraws when they see
/// these.
pub const CI_ENV_DENYLIST: &[&str] = &[
    "CI",
    "CONTINUOUS_INTEGRATION",
    "BUILD_NUMBER",
    "RUN_ID",
    "CI_NAME",
    "GITHUB_ACTIONS",
    "GITLAB_CI",
    "CIRCLECI",
    "TRAVIS",
    "APPVEYOR",
    "BUILDKITE",
    "DRONE",
    "SEMAPHORE",
    "TF_BUILD",
    "TEAMCITY_VERSION",
    "JENKINS_URL",
    "HUDSON_URL",
    "BITBUCKET_COMMIT",
    "CODEBUILD_BUILD_ARN",
    "SYSTEM_TEAMFOUNDATIONCOLLECTIONURI",
];

/// Prefixes of IDE integration variables.
pub const IDE_ENV_PREFIX_DENYLIST: &[&str] = &["VSCODE_", "ELECTRON_", "GITHUB_CODESPACES_"];

/// Host terminal and credential helper variables that must not leak into
/// pane shells.
const HOST_ENV_DENYLIST: &[&str] = &[
    "TERM_PROGRAM",
    "TERM_PROGRAM_VERSION",
    "VSCODE_IPC_HOOK_CLI",
    "GIT_ASKPASS",
    "SSH_ASKPASS",
];

/// How pane shells are launched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellConfig {
    /// Shell executable
    pub program: PathBuf,
    /// Arguments, `-l` for a login shell by default
    pub args: Vec<String>,
    /// Value of `TERM`
    pub term: String,
    /// Value of `TERM_PROGRAM`
    pub term_program: String,
    /// Extra variables, applied last
    pub env: BTreeMap<String, String>,
    /// Strip CI and IDE variables inherited from the host
    pub sanitize_env: bool,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            program: default_shell(),
            args: vec!["-l".to_string()],
            term: "xterm-256color".to_string(),
            term_program: "gridterm".to_string(),
            env: BTreeMap::new(),
            sanitize_env: true,
        }
    }
}

impl ShellConfig {
    /// Replaces the interactive shell with a one-off command run through
    /// the same shell (`<shell> -l -c <command>`).
    #[must_use]
    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.args = vec!["-l".to_string(), "-c".to_string(), command.into()];
        self
    }

    /// Variables set for every session on top of the inherited environment.
    #[must_use]
    pub fn session_env(&self, size: Dimensions) -> Vec<(String, String)> {
        let mut vars = vec![
            ("SHELL".to_string(), self.program.display().to_string()),
            ("TERM".to_string(), self.term.clone()),
            ("TERM_PROGRAM".to_string(), self.term_program.clone()),
            ("COLORTERM".to_string(), "truecolor".to_string()),
            ("COLUMNS".to_string(), size.cols.to_string()),
            ("LINES".to_string(), size.rows.to_string()),
            ("FORCE_COLOR".to_string(), "3".to_string()),
            ("CLICOLOR_FORCE".to_string(), "1".to_string()),
            ("PROMPT_EOL_MARK".to_string(), String::new()),
        ];
        vars.extend(self.env.iter().map(|(k, v)| (k.clone(), v.clone())));
        vars
    }
}

/// `$SHELL`, or [`FALLBACK_SHELL`] when unset or empty.
#[must_use]
pub fn default_shell() -> PathBuf {
    std::env::var_os("SHELL")
        .filter(|shell| !shell.is_empty())
        .map_or_else(|| PathBuf::from(FALLBACK_SHELL), PathBuf::from)
}

/// Returns true if an inherited variable is stripped from pane shells.
#[must_use]
pub fn is_denied_env(key: &str) -> bool {
    CI_ENV_DENYLIST.contains(&key)
        || HOST_ENV_DENYLIST.contains(&key)
        || IDE_ENV_PREFIX_DENYLIST
            .iter()
            .any(|prefix| key.starts_with(prefix))
}
