use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serde json error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    #[error("rule file {path}: {source}")]
    RuleFile {
        path: String,
        #[source]
        source: Box<Error>,
    },

    #[error("rule file {0} is not a JSON object at its top level")]
    RuleFileShape(String),

    #[error("tree-sitter language error for {0}")]
    TreeSitterLanguage(&'static str),

    #[error("tree-sitter parse error for {0}")]
    TreeSitterParse(&'static str),

    #[error("repository path does not exist or is not a directory: {0}")]
    RepoNotFound(String),
}

pub type Result<T> = std::result::Result<T, Error>;
