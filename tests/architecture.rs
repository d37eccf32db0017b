//! Architecture checks
//!
//! The wheel and the store are built once and shared by the front-end,
//! and the reflector crosses await points, so all of them must be
//! thread-safe. Storage must not depend on the reflection provider.

#[cfg(test)]
mod architecture_tests {
    use cbt_journal::reflection::{LLMProvider, OpenAICompatibleProvider};
    use cbt_journal::{EmotionWheel, JournalEntry, JournalStore, Reflector};

    #[test]
    fn test_shared_components_are_thread_safe() {
        fn assert_send_sync<T: Send + Sync>() {}

        assert_send_sync::<EmotionWheel>();
        assert_send_sync::<JournalStore>();
        assert_send_sync::<JournalEntry>();
        assert_send_sync::<Reflector>();
    }

    #[test]
    fn test_provider_abstraction() {
        fn assert_provider<T: LLMProvider>() {}
        assert_provider::<OpenAICompatibleProvider>();
    }

    #[test]
    fn test_errors_convert_into_anyhow() {
        fn assert_std_error<E: std::error::Error + Send + Sync + 'static>() {}

        assert_std_error::<cbt_journal::StorageError>();
        assert_std_error::<cbt_journal::TaxonomyError>();
        assert_std_error::<cbt_journal::emotions::EmotionPathError>();
        assert_std_error::<cbt_journal::reflection::ReflectionError>();
    }
}
