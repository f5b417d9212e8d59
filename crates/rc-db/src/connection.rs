//! Scoped, named connection acquisition

/// A named connection held for the lifetime of the value.
///
/// Dropping the scope releases the connection, including on early return
/// through `?`.
pub struct ConnectionScope<'a> {
    name: String,
    release: Option<Box<dyn FnOnce() + Send + 'a>>,
}

impl<'a> ConnectionScope<'a> {
    /// Create a scope that runs `release` when dropped
    pub fn new(name: impl Into<String>, release: impl FnOnce() + Send + 'a) -> Self {
        let name = name.into();
        log::debug!("Acquired connection '{}'", name);
        Self {
            name,
            release: Some(Box::new(release)),
        }
    }

    /// Label the connection was acquired under
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Debug for ConnectionScope<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionScope")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl Drop for ConnectionScope<'_> {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
            log::debug!("Released connection '{}'", self.name);
        }
    }
}
