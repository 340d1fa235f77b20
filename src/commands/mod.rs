//! Role-scoped voice commands: collaborator seams, the static command
//! table, and the first-match-wins dispatcher.

pub mod context;
pub mod dispatcher;
pub mod table;

pub use context::{
    FixedRoleLookup, MockSessionGate, Navigator, PageText, RecordingNavigator, RoleLookup,
    SessionGate, StaticPage,
};
pub use dispatcher::{CommandDispatcher, DispatchContext};
pub use table::{CommandAction, CommandEntry, Role, Scope, base_table, effective_table, role_table};
