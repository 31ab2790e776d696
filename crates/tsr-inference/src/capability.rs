//! Lazily-initialized model capabilities.

use std::fmt;

use tracing::{debug, info, warn};

use crate::error::InferenceError;
use crate::Result;

/// Loader invoked to initialize a capability.
pub type Loader<T> = Box<dyn Fn() -> Result<T> + Send + Sync>;

/// Loading state of a capability, reported to the UI layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModelLoadingState {
    /// Not yet requested.
    #[default]
    Idle,
    /// Initialization in progress.
    Loading,
    /// Initialized and ready.
    Loaded,
    /// Last initialization attempt failed.
    Error,
}

impl ModelLoadingState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Loaded => "loaded",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for ModelLoadingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A capability that is loaded at most once and then reused.
///
/// A successful load is memoized for the lifetime of the capability and never
/// reloaded. A failed load leaves the capability in [`ModelLoadingState::Error`]
/// and is attempted again on the next call to [`Capability::ensure_loaded`].
pub struct Capability<T> {
    name: String,
    state: ModelLoadingState,
    handle: Option<T>,
    loader: Option<Loader<T>>,
}

impl<T: Clone> Capability<T> {
    /// Create a capability initialized on demand by `loader`.
    pub fn new(name: impl Into<String>, loader: Loader<T>) -> Self {
        Self {
            name: name.into(),
            state: ModelLoadingState::Idle,
            handle: None,
            loader: Some(loader),
        }
    }

    /// Create a capability with no loader. It never becomes available.
    pub fn absent(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: ModelLoadingState::Idle,
            handle: None,
            loader: None,
        }
    }

    /// Create a capability that is already loaded.
    pub fn loaded(name: impl Into<String>, handle: T) -> Self {
        Self {
            name: name.into(),
            state: ModelLoadingState::Loaded,
            handle: Some(handle),
            loader: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> ModelLoadingState {
        self.state
    }

    /// Whether a loader is registered.
    pub fn is_configured(&self) -> bool {
        self.handle.is_some() || self.loader.is_some()
    }

    /// Return the handle, initializing it first if needed.
    pub fn ensure_loaded(&mut self) -> Result<T> {
        if let Some(handle) = &self.handle {
            return Ok(handle.clone());
        }

        let Some(loader) = &self.loader else {
            return Err(InferenceError::NotConfigured(self.name.clone()));
        };

        debug!("Initializing capability: {}", self.name);
        self.state = ModelLoadingState::Loading;

        match loader() {
            Ok(handle) => {
                info!("Capability {} initialized successfully", self.name);
                self.state = ModelLoadingState::Loaded;
                self.handle = Some(handle.clone());
                Ok(handle)
            }
            Err(e) => {
                warn!("Error initializing capability {}: {}", self.name, e);
                self.state = ModelLoadingState::Error;
                Err(e)
            }
        }
    }
}

impl<T> fmt::Debug for Capability<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Capability")
            .field("name", &self.name)
            .field("state", &self.state)
            .field("initialized", &self.handle.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_loads_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let mut cap: Capability<u32> = Capability::new(
            "answerer",
            Box::new(move || -> Result<u32> {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(7)
            }),
        );

        assert_eq!(cap.state(), ModelLoadingState::Idle);
        assert_eq!(cap.ensure_loaded().unwrap(), 7);
        assert_eq!(cap.ensure_loaded().unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cap.state(), ModelLoadingState::Loaded);
    }

    #[test]
    fn test_failed_load_is_retried() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let mut cap: Capability<u32> = Capability::new(
            "flaky",
            Box::new(move || -> Result<u32> {
                if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err(InferenceError::ModelLoad("network down".to_string()))
                } else {
                    Ok(1)
                }
            }),
        );

        assert!(cap.ensure_loaded().is_err());
        assert_eq!(cap.state(), ModelLoadingState::Error);

        assert_eq!(cap.ensure_loaded().unwrap(), 1);
        assert_eq!(cap.state(), ModelLoadingState::Loaded);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_absent_capability() {
        let mut cap: Capability<u32> = Capability::absent("scorer");
        assert!(!cap.is_configured());
        assert!(matches!(
            cap.ensure_loaded(),
            Err(InferenceError::NotConfigured(name)) if name == "scorer"
        ));
        assert_eq!(cap.state(), ModelLoadingState::Idle);
    }
}
