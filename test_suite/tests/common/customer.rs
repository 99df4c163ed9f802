use gridcrate::{EntitySchema, GridEntity};
use std::sync::LazyLock;

#[derive(Debug, Clone, PartialEq)]
pub struct Address {
    pub city: String,
    pub zip: Option<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Customer {
    pub name: String,
    pub address: Address,
    pub manager: Option<Box<Customer>>,
}

static ADDRESS_SCHEMA: LazyLock<EntitySchema<Address>> = LazyLock::new(|| {
    EntitySchema::builder()
        .property("City", |a: &Address| &a.city)
        .property("Zip", |a: &Address| &a.zip)
        .build()
        .expect("address schema")
});

static CUSTOMER_SCHEMA: LazyLock<EntitySchema<Customer>> = LazyLock::new(|| {
    EntitySchema::builder()
        .property("Name", |c: &Customer| &c.name)
        .nested("Address", |c: &Customer| &c.address)
        .nested_optional("Manager", |c: &Customer| c.manager.as_deref())
        .build()
        .expect("customer schema")
});

impl GridEntity for Address {
    fn schema() -> &'static EntitySchema<Self> {
        &ADDRESS_SCHEMA
    }
}

impl GridEntity for Customer {
    fn schema() -> &'static EntitySchema<Self> {
        &CUSTOMER_SCHEMA
    }
}

impl Customer {
    pub fn new(name: &str, city: &str, zip: Option<u32>) -> Self {
        Self {
            name: name.to_string(),
            address: Address {
                city: city.to_string(),
                zip,
            },
            manager: None,
        }
    }

    #[must_use]
    pub fn managed_by(mut self, manager: Customer) -> Self {
        self.manager = Some(Box::new(manager));
        self
    }
}

/// Four customers; Dana and Eve have a manager, the others do not.
pub fn customers() -> Vec<Customer> {
    let alice = Customer::new("Alice", "Oslo", Some(150));
    let bob = Customer::new("Bob", "Bergen", None);
    vec![
        alice.clone(),
        bob.clone(),
        Customer::new("Dana", "Oslo", Some(151)).managed_by(alice),
        Customer::new("Eve", "Trondheim", Some(7010)).managed_by(bob),
    ]
}
