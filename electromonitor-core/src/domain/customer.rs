#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Customer {
    pub id: String,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub phone: Option<String>,
}

impl Customer {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            phone: None,
        }
    }
}

/// Ordered, session-scoped list of customers.
///
/// Entries are never removed or edited; `register` only appends.
#[derive(Debug, Clone, Default)]
pub struct CustomerDirectory {
    customers: Vec<Customer>,
}

impl CustomerDirectory {
    pub fn new(customers: Vec<Customer>) -> Self {
        Self { customers }
    }

    /// The three demo customers every session starts with.
    pub fn seeded() -> Self {
        Self::new(vec![
            Customer::new("c1", "Arun Kumar"),
            Customer::new("c2", "Sneha Bhat"),
            Customer::new("c3", "Ramya R."),
        ])
    }

    pub fn get(&self, id: &str) -> Option<&Customer> {
        self.customers.iter().find(|c| c.id == id)
    }

    pub fn find_by_phone(&self, phone: &str) -> Option<&Customer> {
        self.customers
            .iter()
            .find(|c| c.phone.as_deref() == Some(phone))
    }

    pub fn first(&self) -> Option<&Customer> {
        self.customers.first()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Customer> {
        self.customers.iter()
    }

    pub fn len(&self) -> usize {
        self.customers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.customers.is_empty()
    }

    /// Append a customer under the next free `c<N>` id.
    pub fn register(&mut self, name: impl Into<String>, phone: Option<String>) -> &Customer {
        let mut n = self.customers.len() + 1;
        while self.get(&format!("c{n}")).is_some() {
            n += 1;
        }

        self.customers.push(Customer {
            id: format!("c{n}"),
            name: name.into(),
            phone,
        });
        &self.customers[self.customers.len() - 1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_directory_has_demo_customers_in_order() {
        let dir = CustomerDirectory::seeded();
        let names: Vec<_> = dir.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Arun Kumar", "Sneha Bhat", "Ramya R."]);
        assert_eq!(dir.get("c2").map(|c| c.name.as_str()), Some("Sneha Bhat"));
        assert!(dir.get("c9").is_none());
    }

    #[test]
    fn register_assigns_next_free_id() {
        let mut dir = CustomerDirectory::seeded();
        let id = dir
            .register("Priya N.", Some("9876543210".to_string()))
            .id
            .clone();
        assert_eq!(id, "c4");
        assert_eq!(
            dir.find_by_phone("9876543210").map(|c| c.id.as_str()),
            Some("c4")
        );
    }

    #[test]
    fn register_skips_ids_already_taken() {
        let mut dir = CustomerDirectory::new(vec![Customer::new("c2", "Existing")]);
        assert_eq!(dir.register("New", None).id, "c3");
    }
}
