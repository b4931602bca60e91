//! Integration crate: no logic of its own, just the §2 pipeline wired
//! end to end for tests.
//!
//! ```text
//! submit(raw) -> access_control::has_permission(Action::Submit)
//!             -> form_validator::check_submission_gates + validate_submission
//!             -> response_store::ResponseStoreService::submit
//!             -> workflow_engine::WorkflowEngine::on_submission_success
//!             -> webhook_dispatcher::WebhookDispatcher::dispatch_event(Submitted)
//!             -> notifier::Notifier::notify_submission
//! ```
//!
//! Each arrow is a crate boundary owned elsewhere in this workspace; this
//! crate's only job is gluing those calls together the way a caller's own
//! HTTP layer would (§1/§6 explicitly leave that transport out of scope).
//! `tests/` exercises the wiring against the §8 testable properties.

pub use access_control;
pub use analytics_engine;
pub use auth_identity;
pub use email_service;
pub use export_engine;
pub use expr_eval;
pub use form_validator;
pub use notifier;
pub use platform_config;
pub use response_store;
pub use schema_engine;
pub use webhook_dispatcher;
pub use workflow_engine;
