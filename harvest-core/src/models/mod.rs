pub mod session;
pub mod transaction;
pub mod turn;

pub use session::ChatSession;
pub use transaction::Transaction;
pub use turn::ChatTurn;
