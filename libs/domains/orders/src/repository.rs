use async_trait::async_trait;
use domain_catalog::Product;
use domain_users::User;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::{OwnedRwLockWriteGuard, RwLock};

use crate::error::{OrderError, OrderResult};
use crate::models::{
    AddToCartRequest, CartLine, CartLineDetail, DeliveryContact, DeliveryStatus, DeliveryTime,
    DeliveryUpdate, NewOrder, Order, OrderDetail, OrderScope, PENDING,
};

/// Writes that must succeed or fail together.
///
/// Obtained from [`OrderRepository::begin`]. Nothing is visible to other
/// readers until [`commit`](OrderUnitOfWork::commit); dropping the unit of
/// work without committing discards its writes.
#[async_trait]
pub trait OrderUnitOfWork: Send {
    /// Cart lines of a user, ordered by id
    async fn cart_lines(&mut self, user_id: i32) -> OrderResult<Vec<CartLine>>;

    /// `None` when the store did not hand back the persisted row
    async fn save_order(&mut self, order: NewOrder) -> OrderResult<Option<Order>>;

    /// Number of cart lines removed
    async fn delete_cart_line(&mut self, cart_id: i32) -> OrderResult<u64>;

    /// Sets the schedule on every row of `order_id`; returns the rows touched
    async fn update_delivery_status(
        &mut self,
        order_id: &str,
        update: &DeliveryUpdate,
    ) -> OrderResult<u64>;

    /// Assigns the delivery person on every row of `order_id`; returns the rows touched
    async fn assign_delivery_person(
        &mut self,
        order_id: &str,
        delivery_person_id: i32,
    ) -> OrderResult<u64>;

    async fn commit(self: Box<Self>) -> OrderResult<()>;

    async fn rollback(self: Box<Self>) -> OrderResult<()>;
}

/// Repository trait for orders
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn begin(&self) -> OrderResult<Box<dyn OrderUnitOfWork>>;

    /// Order rows joined with product and customer, ordered by row id.
    /// Rows whose product or customer is gone are left out.
    async fn list_details(&self, scope: OrderScope) -> OrderResult<Vec<OrderDetail>>;

    async fn find_delivery_person(&self, id: i32) -> OrderResult<Option<DeliveryContact>>;
}

/// Repository trait for cart lines
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CartRepository: Send + Sync {
    async fn add(&self, input: AddToCartRequest) -> OrderResult<CartLine>;

    /// A user's cart lines joined with their products, ordered by id
    async fn list_for_user(&self, user_id: i32) -> OrderResult<Vec<CartLineDetail>>;

    /// Returns false when nothing was deleted
    async fn delete(&self, id: i32) -> OrderResult<bool>;

    async fn product_exists(&self, product_id: i32) -> OrderResult<bool>;
}

#[derive(Clone, Default)]
struct OrderState {
    products: HashMap<i32, Product>,
    users: HashMap<i32, User>,
    carts: BTreeMap<i32, CartLine>,
    orders: BTreeMap<i32, Order>,
    next_cart_id: i32,
    next_order_id: i32,
}

impl OrderState {
    fn insert_order(&mut self, input: NewOrder) -> OrderResult<Order> {
        // mirrors the foreign keys on orders
        if !self.users.contains_key(&input.user_id) {
            return Err(OrderError::Database(format!("user {} does not exist", input.user_id)));
        }
        if !self.products.contains_key(&input.product_id) {
            return Err(OrderError::Database(format!(
                "product {} does not exist",
                input.product_id
            )));
        }

        self.next_order_id += 1;
        let order = Order {
            id: self.next_order_id,
            order_id: input.order_id,
            user_id: input.user_id,
            product_id: input.product_id,
            quantity: input.quantity,
            order_date: input.order_date,
            delivery_date: PENDING.to_string(),
            delivery_time: DeliveryTime::Default,
            delivery_status: DeliveryStatus::Pending,
            delivery_person_id: 0,
            delivery_assigned: false,
        };
        self.orders.insert(order.id, order.clone());
        Ok(order)
    }

    fn update_where<F>(&mut self, order_id: &str, mut apply: F) -> u64
    where
        F: FnMut(&mut Order),
    {
        let mut touched = 0;
        for order in self.orders.values_mut().filter(|o| o.order_id == order_id) {
            apply(order);
            touched += 1;
        }
        touched
    }
}

/// In-memory orders and carts for tests and local runs.
///
/// Products and users are registered explicitly so that listings can be
/// joined the way the database joins them.
#[derive(Clone, Default)]
pub struct InMemoryOrderStore {
    state: Arc<RwLock<OrderState>>,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn register_product(&self, product: &Product) {
        self.state
            .write()
            .await
            .products
            .insert(product.id, product.clone());
    }

    pub async fn register_user(&self, user: &User) {
        self.state.write().await.users.insert(user.id, user.clone());
    }

    /// All order rows, ordered by row id
    pub async fn orders(&self) -> Vec<Order> {
        self.state.read().await.orders.values().cloned().collect()
    }

    pub async fn cart_lines(&self, user_id: i32) -> Vec<CartLine> {
        self.state
            .read()
            .await
            .carts
            .values()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect()
    }
}

/// Holds the store's write lock; writes go to a working copy that replaces
/// the store's state on commit.
pub struct InMemoryUnitOfWork {
    guard: OwnedRwLockWriteGuard<OrderState>,
    working: OrderState,
}

#[async_trait]
impl OrderUnitOfWork for InMemoryUnitOfWork {
    async fn cart_lines(&mut self, user_id: i32) -> OrderResult<Vec<CartLine>> {
        Ok(self
            .working
            .carts
            .values()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn save_order(&mut self, order: NewOrder) -> OrderResult<Option<Order>> {
        self.working.insert_order(order).map(Some)
    }

    async fn delete_cart_line(&mut self, cart_id: i32) -> OrderResult<u64> {
        Ok(self.working.carts.remove(&cart_id).map_or(0, |_| 1))
    }

    async fn update_delivery_status(
        &mut self,
        order_id: &str,
        update: &DeliveryUpdate,
    ) -> OrderResult<u64> {
        Ok(self.working.update_where(order_id, |order| {
            order.delivery_date = update.delivery_date.clone();
            order.delivery_time = update.delivery_time;
            order.delivery_status = update.delivery_status;
        }))
    }

    async fn assign_delivery_person(
        &mut self,
        order_id: &str,
        delivery_person_id: i32,
    ) -> OrderResult<u64> {
        Ok(self.working.update_where(order_id, |order| {
            order.delivery_person_id = delivery_person_id;
            order.delivery_assigned = true;
        }))
    }

    async fn commit(self: Box<Self>) -> OrderResult<()> {
        let InMemoryUnitOfWork { mut guard, working } = *self;
        *guard = working;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> OrderResult<()> {
        Ok(())
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderStore {
    async fn begin(&self) -> OrderResult<Box<dyn OrderUnitOfWork>> {
        let guard = Arc::clone(&self.state).write_owned().await;
        let working = guard.clone();
        Ok(Box::new(InMemoryUnitOfWork { guard, working }))
    }

    async fn list_details(&self, scope: OrderScope) -> OrderResult<Vec<OrderDetail>> {
        let state = self.state.read().await;

        let details = state
            .orders
            .values()
            .filter(|o| match &scope {
                OrderScope::All => true,
                OrderScope::Customer(user_id) => o.user_id == *user_id,
                OrderScope::OrderId(order_id) => o.order_id == *order_id,
                OrderScope::DeliveryPerson(id) => o.delivery_person_id == *id,
            })
            .filter_map(|o| {
                let product = state.products.get(&o.product_id)?;
                let user = state.users.get(&o.user_id)?;
                Some(OrderDetail {
                    order_id: o.order_id.clone(),
                    user_id: o.user_id,
                    product_id: o.product_id,
                    quantity: o.quantity,
                    order_date: o.order_date,
                    delivery_date: o.delivery_date.clone(),
                    delivery_time: o.delivery_time,
                    delivery_status: o.delivery_status,
                    delivery_person_id: o.delivery_person_id,
                    product_title: product.title.clone(),
                    product_description: product.description.clone(),
                    product_image: product.image_name.clone(),
                    product_price: product.price,
                    user_first_name: user.first_name.clone(),
                    user_last_name: user.last_name.clone(),
                    user_phone: user.phone_no.clone(),
                    user_address: user.address.clone(),
                })
            })
            .collect();

        Ok(details)
    }

    async fn find_delivery_person(&self, id: i32) -> OrderResult<Option<DeliveryContact>> {
        Ok(self.state.read().await.users.get(&id).map(|u| DeliveryContact {
            name: u.first_name.clone(),
            contact: u.phone_no.clone(),
        }))
    }
}

#[async_trait]
impl CartRepository for InMemoryOrderStore {
    async fn add(&self, input: AddToCartRequest) -> OrderResult<CartLine> {
        let mut state = self.state.write().await;

        if !state.users.contains_key(&input.user_id) {
            return Err(OrderError::Database(format!("user {} does not exist", input.user_id)));
        }
        if !state.products.contains_key(&input.product_id) {
            return Err(OrderError::ProductNotFound(input.product_id));
        }

        state.next_cart_id += 1;
        let line = CartLine {
            id: state.next_cart_id,
            user_id: input.user_id,
            product_id: input.product_id,
            quantity: input.quantity,
        };
        state.carts.insert(line.id, line.clone());

        tracing::info!(cart_id = line.id, user_id = line.user_id, "Added cart line");
        Ok(line)
    }

    async fn list_for_user(&self, user_id: i32) -> OrderResult<Vec<CartLineDetail>> {
        let state = self.state.read().await;

        Ok(state
            .carts
            .values()
            .filter(|c| c.user_id == user_id)
            .filter_map(|c| {
                let product = state.products.get(&c.product_id)?;
                Some(CartLineDetail {
                    id: c.id,
                    product_id: c.product_id,
                    quantity: c.quantity,
                    product_title: product.title.clone(),
                    product_image: product.image_name.clone(),
                    product_price: product.price,
                })
            })
            .collect())
    }

    async fn delete(&self, id: i32) -> OrderResult<bool> {
        Ok(self.state.write().await.carts.remove(&id).is_some())
    }

    async fn product_exists(&self, product_id: i32) -> OrderResult<bool> {
        Ok(self.state.read().await.products.contains_key(&product_id))
    }
}
