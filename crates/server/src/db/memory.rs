//! In-memory backend for the store traits.
//!
//! Mirrors the `PostgreSQL` schema's behavior, including the unique
//! constraint on `phone_id`, and adds hooks tests need:
//!
//! - per-operation failure injection ([`MemoryStore::fail`])
//! - per-operation call counters ([`MemoryStore::calls`])
//! - an optional lookup gate that holds every lookup until a
//!   [`Barrier`] releases, to reproduce the read-then-write race
//! - [`MemoryStore::seed_customer`], which bypasses the unique constraint to
//!   model data written before the constraint existed

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex as StdMutex, PoisonError};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{Barrier, Mutex};

use intake_core::{CustomerId, OrderId, PhoneId};

use super::{CustomerStore, Lookup, OrderStore, Store, StoreError};
use crate::models::{Customer, CustomerFields, NewOrder, Order, Upserted};

/// Store operations that can be counted or made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Lookup,
    Update,
    Insert,
    Upsert,
    InsertOrder,
    Ping,
}

impl Operation {
    /// Whether the operation writes.
    #[must_use]
    pub const fn is_write(self) -> bool {
        matches!(
            self,
            Self::Update | Self::Insert | Self::Upsert | Self::InsertOrder
        )
    }
}

#[derive(Debug, Default)]
struct Tables {
    customers: Vec<Customer>,
    orders: Vec<Order>,
    last_customer_id: i32,
    last_order_id: i32,
}

impl Tables {
    fn next_customer_id(&mut self) -> CustomerId {
        self.last_customer_id += 1;
        CustomerId::new(self.last_customer_id)
    }

    fn next_order_id(&mut self) -> OrderId {
        self.last_order_id += 1;
        OrderId::new(self.last_order_id)
    }

    fn new_customer(&mut self, phone_id: Option<PhoneId>, fields: &CustomerFields) -> Customer {
        let now = Utc::now();
        let customer = Customer {
            id: self.next_customer_id(),
            phone_id,
            fullname: fields.fullname.clone(),
            address: fields.address.clone(),
            phone: fields.phone.clone(),
            created_at: now,
            updated_at: now,
        };
        self.customers.push(customer.clone());
        customer
    }

    fn keyed_mut(&mut self, phone_id: &PhoneId) -> Option<&mut Customer> {
        self.customers
            .iter_mut()
            .find(|c| c.phone_id.as_ref() == Some(phone_id))
    }
}

fn overwrite(customer: &mut Customer, fields: &CustomerFields) {
    customer.fullname.clone_from(&fields.fullname);
    customer.address.clone_from(&fields.address);
    customer.phone.clone_from(&fields.phone);
    customer.updated_at = Utc::now();
}

#[derive(Debug, Default)]
struct Hooks {
    calls: HashMap<Operation, usize>,
    failing: HashSet<Operation>,
}

/// Store held entirely in process memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    hooks: StdMutex<Hooks>,
    lookup_gate: Option<Arc<Barrier>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Hold every lookup, after it has read the table, until `barrier`
    /// releases.
    #[must_use]
    pub fn with_lookup_gate(mut self, barrier: Arc<Barrier>) -> Self {
        self.lookup_gate = Some(barrier);
        self
    }

    /// Make every later call to `op` fail with `StoreError::Unavailable`.
    pub fn fail(&self, op: Operation) {
        self.hooks().failing.insert(op);
    }

    /// Undo [`MemoryStore::fail`] for `op`.
    pub fn recover(&self, op: Operation) {
        self.hooks().failing.remove(&op);
    }

    /// Number of times `op` was invoked, including failed attempts.
    #[must_use]
    pub fn calls(&self, op: Operation) -> usize {
        self.hooks().calls.get(&op).copied().unwrap_or(0)
    }

    /// Number of write attempts of any kind.
    #[must_use]
    pub fn write_attempts(&self) -> usize {
        self.hooks()
            .calls
            .iter()
            .filter(|(op, _)| op.is_write())
            .map(|(_, n)| n)
            .sum()
    }

    /// Snapshot of stored customers in insertion order.
    pub async fn customers(&self) -> Vec<Customer> {
        self.tables.lock().await.customers.clone()
    }

    /// Snapshot of stored orders in insertion order.
    pub async fn orders(&self) -> Vec<Order> {
        self.tables.lock().await.orders.clone()
    }

    /// Insert a customer without enforcing the unique key.
    pub async fn seed_customer(
        &self,
        phone_id: Option<PhoneId>,
        fields: &CustomerFields,
    ) -> Customer {
        self.tables.lock().await.new_customer(phone_id, fields)
    }

    fn hooks(&self) -> std::sync::MutexGuard<'_, Hooks> {
        self.hooks.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn enter(&self, op: Operation) -> Result<(), StoreError> {
        let mut hooks = self.hooks();
        *hooks.calls.entry(op).or_insert(0) += 1;
        if hooks.failing.contains(&op) {
            return Err(StoreError::Unavailable(format!(
                "injected failure for {op:?}"
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl CustomerStore for MemoryStore {
    async fn find_by_phone_id(&self, phone_id: &PhoneId) -> Result<Lookup<Customer>, StoreError> {
        self.enter(Operation::Lookup)?;

        let matches: Vec<Customer> = {
            let tables = self.tables.lock().await;
            tables
                .customers
                .iter()
                .filter(|c| c.phone_id.as_ref() == Some(phone_id))
                .take(2)
                .cloned()
                .collect()
        };

        if let Some(gate) = &self.lookup_gate {
            gate.wait().await;
        }

        let mut matches = matches.into_iter();
        match (matches.next(), matches.next()) {
            (None, _) => Ok(Lookup::NotFound),
            (Some(customer), None) => Ok(Lookup::Found(customer)),
            (Some(_), Some(_)) => Err(StoreError::DuplicateKey(format!(
                "phone_id {phone_id} matches more than one customer"
            ))),
        }
    }

    async fn update_fields(
        &self,
        phone_id: &PhoneId,
        fields: &CustomerFields,
    ) -> Result<Customer, StoreError> {
        self.enter(Operation::Update)?;

        let mut tables = self.tables.lock().await;
        let customer = tables.keyed_mut(phone_id).ok_or(StoreError::NotFound)?;
        overwrite(customer, fields);
        Ok(customer.clone())
    }

    async fn insert(
        &self,
        phone_id: Option<&PhoneId>,
        fields: &CustomerFields,
    ) -> Result<Customer, StoreError> {
        self.enter(Operation::Insert)?;

        let mut tables = self.tables.lock().await;
        if let Some(key) = phone_id
            && tables.keyed_mut(key).is_some()
        {
            return Err(StoreError::Conflict("phone_id already exists".to_owned()));
        }
        Ok(tables.new_customer(phone_id.cloned(), fields))
    }

    async fn upsert(
        &self,
        phone_id: &PhoneId,
        fields: &CustomerFields,
    ) -> Result<Upserted, StoreError> {
        self.enter(Operation::Upsert)?;

        let mut tables = self.tables.lock().await;
        if let Some(customer) = tables.keyed_mut(phone_id) {
            overwrite(customer, fields);
            return Ok(Upserted {
                customer: customer.clone(),
                inserted: false,
            });
        }
        let customer = tables.new_customer(Some(phone_id.clone()), fields);
        Ok(Upserted {
            customer,
            inserted: true,
        })
    }
}

#[async_trait]
impl OrderStore for MemoryStore {
    async fn insert_order(&self, order: &NewOrder) -> Result<Order, StoreError> {
        self.enter(Operation::InsertOrder)?;

        let mut tables = self.tables.lock().await;
        let stored = Order {
            id: tables.next_order_id(),
            client_ai: order.client_ai.clone(),
            name: order.name.clone(),
            phone: order.phone.clone(),
            town: order.town.clone(),
            city: order.city.clone(),
            products: order.products.clone(),
            total: order.total,
            payment_method: order.payment_method.clone(),
            observations: order.observations.clone(),
            created_at: Utc::now(),
        };
        tables.orders.push(stored.clone());
        Ok(stored)
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        self.enter(Operation::Ping)
    }
}
