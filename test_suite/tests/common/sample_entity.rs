use chrono::NaiveDate;
use gridcrate::{EntitySchema, GridEntity};
use std::sync::LazyLock;

#[derive(Debug, Clone, PartialEq)]
pub struct TestEntity {
    pub numeric_property: i32,
    pub string_property: Option<String>,
    pub date_property: NaiveDate,
    pub amount: rust_decimal::Decimal,
}

static TEST_ENTITY_SCHEMA: LazyLock<EntitySchema<TestEntity>> = LazyLock::new(|| {
    EntitySchema::builder()
        .property("NumericProperty", |e: &TestEntity| &e.numeric_property)
        .property("StringProperty", |e: &TestEntity| &e.string_property)
        .property("DateProperty", |e: &TestEntity| &e.date_property)
        .property("Amount", |e: &TestEntity| &e.amount)
        .build()
        .expect("test entity schema")
});

impl GridEntity for TestEntity {
    fn schema() -> &'static EntitySchema<Self> {
        &TEST_ENTITY_SCHEMA
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
}

/// The fixed sample set: `"abc"`, `"def"`, `"ghi"` and a null string.
pub fn sample() -> Vec<TestEntity> {
    with_strings(&[Some("abc"), Some("def"), Some("ghi"), None])
}

/// One entity per string, numbered from 1 and dated a month apart from
/// 2020-01-15.
pub fn with_strings(strings: &[Option<&str>]) -> Vec<TestEntity> {
    strings
        .iter()
        .zip(1..)
        .map(|(s, n)| TestEntity {
            numeric_property: n,
            string_property: s.map(str::to_string),
            date_property: date(2020, u32::try_from(n).expect("small index"), 15),
            amount: rust_decimal::Decimal::new(i64::from(n) * 1050, 2),
        })
        .collect()
}
