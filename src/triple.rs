//! The (lemma, token, msd) annotation record

/// A single annotation triple.
///
/// `lemma` is the dictionary base form, `token` the surface form as it
/// appeared in text, and `msd` a short morphosyntactic descriptor code.
/// The whole triple is unique in storage.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Triple {
    pub lemma: String,
    pub token: String,
    pub msd: String,
}

impl Triple {
    /// Create a new triple
    pub fn new(
        lemma: impl Into<String>,
        token: impl Into<String>,
        msd: impl Into<String>,
    ) -> Self {
        Self {
            lemma: lemma.into(),
            token: token.into(),
            msd: msd.into(),
        }
    }
}

// The API's tuple form is always ordered (lemma, token, msd)
impl From<(String, String, String)> for Triple {
    fn from((lemma, token, msd): (String, String, String)) -> Self {
        Self { lemma, token, msd }
    }
}

impl From<Triple> for (String, String, String) {
    fn from(triple: Triple) -> Self {
        (triple.lemma, triple.token, triple.msd)
    }
}

impl std::fmt::Display for Triple {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.lemma, self.token, self.msd)
    }
}
