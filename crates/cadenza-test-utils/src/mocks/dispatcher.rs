//! Mock implementation of the ActivityDispatcher trait.

use async_trait::async_trait;
use cadenza_core::{ActivityDispatcher, CoreError};
use mockall::mock;

// Generate the mock implementation for ActivityDispatcher
mock! {
    pub ActivityDispatcher {}

    #[async_trait]
    impl ActivityDispatcher for ActivityDispatcher {
        async fn dispatch(&self, name: &str, arguments: Vec<String>) -> Result<String, CoreError>;
    }
}

/// Creates a new mock dispatcher with default expectations.
///
/// Every call fails with `ActivityNotFound`, like an empty registry.
pub fn create_mock_dispatcher() -> MockActivityDispatcher {
    let mut mock = MockActivityDispatcher::new();

    mock.expect_dispatch()
        .returning(|name, _| Err(CoreError::ActivityNotFound(name.to_string())));

    mock
}

/// Creates a mock dispatcher that answers each listed activity with a fixed value.
///
/// Names that are not listed fail with `ActivityNotFound`.
pub fn mock_dispatcher_with_results(results: &[(&str, &str)]) -> MockActivityDispatcher {
    let mut mock = MockActivityDispatcher::new();

    for (name, value) in results {
        let name = name.to_string();
        let value = value.to_string();
        mock.expect_dispatch()
            .withf(move |called, _| called == name)
            .returning(move |_, _| Ok(value.clone()));
    }

    mock.expect_dispatch()
        .returning(|name, _| Err(CoreError::ActivityNotFound(name.to_string())));

    mock
}
