pub mod db;
pub mod model;
pub mod notifier;
pub mod provider;
pub mod sentry;
pub mod settings;
