use super::schema::EntitySchema;

/// An entity type that filters, sorters and pagination can run against.
///
/// Implementors expose a property registry built once, usually held in a
/// `LazyLock` static:
///
/// ```rust,ignore
/// static TASK_SCHEMA: LazyLock<EntitySchema<Task>> = LazyLock::new(|| {
///     EntitySchema::builder()
///         .property("Title", |t: &Task| &t.title)
///         .property("Priority", |t: &Task| &t.priority)
///         .build()
///         .expect("task schema")
/// });
///
/// impl GridEntity for Task {
///     fn schema() -> &'static EntitySchema<Self> {
///         &TASK_SCHEMA
///     }
/// }
/// ```
pub trait GridEntity: Sized + 'static {
    fn schema() -> &'static EntitySchema<Self>;

    /// Name used in log output.
    fn entity_name() -> &'static str {
        std::any::type_name::<Self>()
    }
}
