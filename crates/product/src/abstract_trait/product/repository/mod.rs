mod command;
mod query;

pub use self::command::{DynProductCommandRepository, ProductCommandRepositoryTrait};
pub use self::query::{DynProductQueryRepository, ProductQueryRepositoryTrait};

#[cfg(test)]
pub use self::command::MockProductCommandRepositoryTrait;
#[cfg(test)]
pub use self::query::MockProductQueryRepositoryTrait;
