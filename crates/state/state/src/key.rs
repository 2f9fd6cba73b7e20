use serde::{Deserialize, Serialize};

/// The kind of record being stored.
///
/// `Bare` exists for backward read-compatibility: early deployments stored
/// proposal sets under the raw session id with no kind prefix. New writes
/// always use a prefixed kind; `Bare` only appears in lookup chains.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyKind {
    /// A session's proposal set.
    Proposals,
    /// A cached final prompt for a selected proposal.
    Prompt,
    /// Poster artifact metadata.
    Poster,
    /// A stored prompt template.
    Template,
    /// Legacy unprefixed key; the id is the whole key.
    Bare,
}

impl KeyKind {
    /// Return the string prefix for this kind.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Proposals => "proposals",
            Self::Prompt => "prompt",
            Self::Poster => "poster",
            Self::Template => "template",
            Self::Bare => "",
        }
    }
}

impl std::fmt::Display for KeyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key used to address records in the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StoreKey {
    pub kind: KeyKind,
    pub id: String,
}

impl StoreKey {
    /// Create a new store key.
    #[must_use]
    pub fn new(kind: KeyKind, id: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.into(),
        }
    }

    /// Canonical key for a session's proposal set.
    #[must_use]
    pub fn proposals(session_id: &str) -> Self {
        Self::new(KeyKind::Proposals, session_id)
    }

    /// Legacy unprefixed key for a session's proposal set.
    #[must_use]
    pub fn bare(session_id: &str) -> Self {
        Self::new(KeyKind::Bare, session_id)
    }

    /// Key for the cached final prompt of one proposal selection.
    #[must_use]
    pub fn prompt(session_id: &str, proposal_id: &str) -> Self {
        Self::new(KeyKind::Prompt, format!("{session_id}:{proposal_id}"))
    }

    /// Key for poster artifact metadata.
    #[must_use]
    pub fn poster(poster_id: &str) -> Self {
        Self::new(KeyKind::Poster, poster_id)
    }

    /// Key for a stored prompt template.
    #[must_use]
    pub fn template(template_id: &str) -> Self {
        Self::new(KeyKind::Template, template_id)
    }

    /// Render the canonical string form: `kind:id`, or just `id` for
    /// [`KeyKind::Bare`].
    #[must_use]
    pub fn canonical(&self) -> String {
        if self.kind == KeyKind::Bare {
            self.id.clone()
        } else {
            format!("{}:{}", self.kind, self.id)
        }
    }
}

impl std::fmt::Display for StoreKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.canonical())
    }
}

/// The ordered key list tried when resolving a session's proposal set.
///
/// The store's key convention changed across deployments; reads must try
/// the canonical prefixed key first, then the legacy bare id. Keeping the
/// chain here (rather than inline at the read site) means every reader
/// agrees on the order.
#[must_use]
pub fn proposal_lookup_keys(session_id: &str) -> Vec<StoreKey> {
    vec![StoreKey::proposals(session_id), StoreKey::bare(session_id)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_prefixed() {
        assert_eq!(StoreKey::proposals("abc").canonical(), "proposals:abc");
        assert_eq!(StoreKey::prompt("s1", "p2").canonical(), "prompt:s1:p2");
        assert_eq!(StoreKey::poster("po-9").canonical(), "poster:po-9");
        assert_eq!(StoreKey::template("led-strip").canonical(), "template:led-strip");
    }

    #[test]
    fn canonical_bare_is_raw_id() {
        assert_eq!(StoreKey::bare("abc").canonical(), "abc");
    }

    #[test]
    fn lookup_chain_orders_canonical_first() {
        let keys = proposal_lookup_keys("s1");
        assert_eq!(keys.len(), 2);
        assert_eq!(keys[0].canonical(), "proposals:s1");
        assert_eq!(keys[1].canonical(), "s1");
    }
}
