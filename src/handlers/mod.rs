// Handlers grouped by the service role that mounts them:
// backend (canonical API), admin (session-gated CMS) and public (site).
pub mod admin;
pub mod backend;
pub mod public;
pub mod system;
