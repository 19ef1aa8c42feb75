use std::path::PathBuf;

/// Errors that can occur in the headless demo.
#[derive(Debug, thiserror::Error)]
pub enum DemoError {
    /// Failed to load a settings file.
    #[error(transparent)]
    Settings(#[from] chairline_data::DataLoadError),

    /// A settings directory holds no `line.{ron,toml,json}`.
    #[error("no settings file named '{base}' in {dir}")]
    SettingsNotFound { dir: PathBuf, base: &'static str },

    /// A command-line value the runner cannot use.
    #[error("invalid value for --{name}: {detail}")]
    InvalidArgument { name: &'static str, detail: String },

    /// The log subscriber could not be installed.
    #[error(transparent)]
    Tracing(#[from] tracing::subscriber::SetGlobalDefaultError),
}
