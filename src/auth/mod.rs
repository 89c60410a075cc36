// ==========================================
// 角色档案追踪 - 会话层
// ==========================================

pub mod session;

pub use session::{SessionProvider, SessionState};
