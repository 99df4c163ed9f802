use chrono::NaiveDate;
use gridcrate::{EntitySchema, GridEntity};
use sea_orm::entity::prelude::*;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, DbErr, Schema};
use std::sync::LazyLock;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "people")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,
    pub name: String,
    pub nickname: Option<String>,
    pub score: f64,
    pub born: Date,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

static PERSON_SCHEMA: LazyLock<EntitySchema<Model>> = LazyLock::new(|| {
    EntitySchema::builder()
        .property("Id", |p: &Model| &p.id)
        .column("id")
        .property("Name", |p: &Model| &p.name)
        .column("name")
        .property("Nickname", |p: &Model| &p.nickname)
        .column("nickname")
        .property("Score", |p: &Model| &p.score)
        .column("score")
        .property("Born", |p: &Model| &p.born)
        .column("born")
        .build()
        .expect("person schema")
});

impl GridEntity for Model {
    fn schema() -> &'static EntitySchema<Self> {
        &PERSON_SCHEMA
    }

    fn entity_name() -> &'static str {
        "person"
    }
}

fn person(id: i32, name: &str, nickname: Option<&str>, score: f64, born: (i32, u32, u32)) -> Model {
    Model {
        id,
        name: name.to_string(),
        nickname: nickname.map(str::to_string),
        score,
        born: NaiveDate::from_ymd_opt(born.0, born.1, born.2).expect("valid birth date"),
    }
}

/// Rows shared by the in-memory and database sides of a comparison. All
/// text is lowercase so `LIKE` behaves the same on every backend.
pub fn people() -> Vec<Model> {
    vec![
        person(1, "alice", Some("ally"), 91.5, (1990, 5, 1)),
        person(2, "bob", None, 72.0, (1985, 11, 23)),
        person(3, "carol", Some("caz"), 55.25, (2001, 2, 14)),
        person(4, "dave", Some(""), 72.0, (1995, 7, 30)),
        person(5, "erin", None, 38.0, (2001, 2, 14)),
        person(6, "frank_o", Some("100%"), 64.5, (1978, 1, 9)),
    ]
}

/// In-memory SQLite database holding [`people`].
pub async fn setup_person_db() -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect("sqlite::memory:").await?;
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);
    db.execute(backend.build(&schema.create_table_from_entity(Entity)))
        .await?;

    Entity::insert_many(people().into_iter().map(ActiveModel::from))
        .exec(&db)
        .await?;
    Ok(db)
}
