mod command;
mod query;

pub use self::command::{DynOrderCommandRepository, OrderCommandRepositoryTrait};
pub use self::query::{DynOrderQueryRepository, OrderQueryRepositoryTrait};

#[cfg(test)]
pub use self::command::MockOrderCommandRepositoryTrait;
#[cfg(test)]
pub use self::query::MockOrderQueryRepositoryTrait;
