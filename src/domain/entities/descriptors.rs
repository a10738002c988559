//! Static descriptors reported by fetchers.

/// Scheduling hint supplied by the caller.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Priority {
    Immediate,
    High,
    #[default]
    Normal,
    Low,
}

/// Kind of data a fetcher produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataClass {
    /// A readable byte stream.
    ByteStream,
}

/// Where fetched data originates.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    Local,
    Remote,
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Local => write!(f, "local"),
            Self::Remote => write!(f, "remote"),
        }
    }
}
