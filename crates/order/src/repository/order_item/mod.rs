mod query;

pub use self::query::OrderItemQueryRepository;
