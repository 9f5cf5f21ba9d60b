pub mod actions;
pub mod engine;
pub mod model;
pub mod parser;
pub mod simple_node;

pub use actions::{Action, PutAction, PutValueAction, RemoveAction, apply_all};
pub use engine::runtime::{Context, Error, NodeView};
pub use engine::value::Value;
pub use model::{Navigator, NodeKind, QName};
pub use parser::ast::{AxisKind, BinaryOp, Expr, Predicate, Step};
pub use parser::{NamespaceContext, ParseError, parse, parse_with_context};
pub use simple_node::SimpleNode;
