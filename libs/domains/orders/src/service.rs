use axum_helpers::messages;
use chrono::{DateTime, Utc};
use rand::Rng;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::instrument;
use validator::Validate;

use crate::error::{OrderError, OrderResult};
use crate::models::{
    AddToCartRequest, CartItem, CartLine, DeliveryContact, DeliveryUpdate, NewOrder, OrderDetail,
    OrderScope, OrderView, UpdateDeliveryStatusRequest,
};
use crate::repository::{CartRepository, OrderRepository, OrderUnitOfWork};

const ORDER_ID_LEN: usize = 10;
const ORDER_ID_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// A fresh checkout id: ten upper-case letters and digits
pub fn generate_order_id() -> String {
    let mut rng = rand::rng();
    (0..ORDER_ID_LEN)
        .map(|_| ORDER_ID_CHARSET[rng.random_range(0..ORDER_ID_CHARSET.len())] as char)
        .collect()
}

/// Order workflow: placement, listings and delivery updates
pub struct OrderService<R: OrderRepository> {
    repository: Arc<R>,
}

impl<R: OrderRepository> Clone for OrderService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R: OrderRepository> OrderService<R> {
    pub fn new(repository: R) -> Self {
        Self::from_shared(Arc::new(repository))
    }

    /// Share a repository with the cart service
    pub fn from_shared(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Turn the user's cart into order rows sharing one new order id.
    ///
    /// Every cart line becomes one order row and is removed from the cart,
    /// all inside one unit of work. Returns the order id.
    #[instrument(skip(self))]
    pub async fn place_order(&self, user_id: i32) -> OrderResult<String> {
        if user_id == 0 {
            return Err(OrderError::MissingField(messages::MISSING_FIELD.to_string()));
        }

        let mut uow = self.repository.begin().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to open unit of work");
            OrderError::PlacementFailed
        })?;

        let lines = match uow.cart_lines(user_id).await {
            Ok(lines) => lines,
            Err(e) => {
                tracing::error!(error = %e, "Failed to read cart");
                discard(uow).await;
                return Err(OrderError::PlacementFailed);
            }
        };

        if lines.is_empty() {
            discard(uow).await;
            return Err(OrderError::EmptyCart);
        }

        let order_id = generate_order_id();
        let line_count = lines.len();

        if let Err(e) = convert_cart(uow.as_mut(), &order_id, lines, Utc::now()).await {
            tracing::error!(order_id = %order_id, error = %e, "Order placement rolled back");
            discard(uow).await;
            return Err(OrderError::PlacementFailed);
        }

        uow.commit().await.map_err(|e| {
            tracing::error!(order_id = %order_id, error = %e, "Failed to commit order");
            OrderError::PlacementFailed
        })?;

        tracing::info!(order_id = %order_id, rows = line_count, "Order placed");
        Ok(order_id)
    }

    #[instrument(skip(self))]
    pub async fn list_user_orders(&self, user_id: i32) -> OrderResult<Vec<OrderView>> {
        if user_id == 0 {
            return Err(OrderError::MissingField("User Id missing".to_string()));
        }
        self.load_views(OrderScope::Customer(user_id)).await
    }

    #[instrument(skip(self))]
    pub async fn list_all_orders(&self) -> OrderResult<Vec<OrderView>> {
        self.load_views(OrderScope::All).await
    }

    #[instrument(skip(self))]
    pub async fn list_by_order_id(&self, order_id: &str) -> OrderResult<Vec<OrderView>> {
        self.load_views(OrderScope::OrderId(order_id.to_string()))
            .await
    }

    /// The delivery person's queue; an empty queue is an error
    #[instrument(skip(self))]
    pub async fn list_delivery_orders(&self, delivery_person_id: i32) -> OrderResult<Vec<OrderView>> {
        if delivery_person_id == 0 {
            return Err(OrderError::MissingField(messages::MISSING_FIELD.to_string()));
        }

        let views = self
            .load_views(OrderScope::DeliveryPerson(delivery_person_id))
            .await?;

        if views.is_empty() {
            return Err(OrderError::OrdersNotFound);
        }
        Ok(views)
    }

    /// Reschedule every row of an order and return the updated rows
    #[instrument(skip(self, request), fields(order_id = %request.order_id))]
    pub async fn update_delivery_status(
        &self,
        request: UpdateDeliveryStatusRequest,
    ) -> OrderResult<Vec<OrderView>> {
        let order_id = require_order_id(&request.order_id)?;

        let (Some(delivery_date), Some(delivery_time), Some(delivery_status)) = (
            request.delivery_date.filter(|d| !d.trim().is_empty()),
            request.delivery_time,
            request.delivery_status,
        ) else {
            return Err(OrderError::MissingField(messages::MISSING_FIELD.to_string()));
        };

        let update = DeliveryUpdate {
            delivery_date: delivery_date.trim().to_string(),
            delivery_time,
            delivery_status,
        };

        let mut uow = self.repository.begin().await?;
        let touched = match uow.update_delivery_status(&order_id, &update).await {
            Ok(touched) => touched,
            Err(e) => {
                discard(uow).await;
                return Err(e);
            }
        };
        finish_update(uow, touched).await?;

        tracing::info!(rows = touched, status = %update.delivery_status, "Delivery status updated");
        self.load_views(OrderScope::OrderId(order_id)).await
    }

    /// Assign a delivery person to every row of an order and return the updated rows
    #[instrument(skip(self, request), fields(order_id = %request.order_id))]
    pub async fn assign_delivery_person(
        &self,
        request: UpdateDeliveryStatusRequest,
    ) -> OrderResult<Vec<OrderView>> {
        let order_id = require_order_id(&request.order_id)?;

        let Some(delivery_person_id) = request.delivery_id.filter(|id| *id > 0) else {
            return Err(OrderError::MissingField(messages::MISSING_FIELD.to_string()));
        };

        let mut uow = self.repository.begin().await?;
        let touched = match uow
            .assign_delivery_person(&order_id, delivery_person_id)
            .await
        {
            Ok(touched) => touched,
            Err(e) => {
                discard(uow).await;
                return Err(e);
            }
        };
        finish_update(uow, touched).await?;

        tracing::info!(rows = touched, delivery_person_id, "Delivery person assigned");
        self.load_views(OrderScope::OrderId(order_id)).await
    }

    async fn load_views(&self, scope: OrderScope) -> OrderResult<Vec<OrderView>> {
        let details = self.repository.list_details(scope).await?;
        self.project(details).await
    }

    /// Resolve delivery persons (once per id) and build the client views
    async fn project(&self, details: Vec<OrderDetail>) -> OrderResult<Vec<OrderView>> {
        let mut contacts: HashMap<i32, DeliveryContact> = HashMap::new();
        let mut views = Vec::with_capacity(details.len());

        for detail in details {
            let id = detail.delivery_person_id;

            let contact = if id == 0 {
                DeliveryContact::pending()
            } else if let Some(contact) = contacts.get(&id) {
                contact.clone()
            } else {
                let contact = match self.repository.find_delivery_person(id).await? {
                    Some(contact) => contact,
                    None => {
                        tracing::warn!(
                            order_id = %detail.order_id,
                            delivery_person_id = id,
                            "Assigned delivery person does not exist"
                        );
                        DeliveryContact::pending()
                    }
                };
                contacts.insert(id, contact.clone());
                contact
            };

            views.push(OrderView::from_detail(detail, contact));
        }

        Ok(views)
    }
}

fn require_order_id(order_id: &str) -> OrderResult<String> {
    let order_id = order_id.trim();
    if order_id.is_empty() {
        return Err(OrderError::MissingField(messages::MISSING_FIELD.to_string()));
    }
    Ok(order_id.to_string())
}

async fn convert_cart(
    uow: &mut dyn OrderUnitOfWork,
    order_id: &str,
    lines: Vec<CartLine>,
    order_date: DateTime<Utc>,
) -> OrderResult<()> {
    for line in lines {
        let saved = uow
            .save_order(NewOrder {
                order_id: order_id.to_string(),
                user_id: line.user_id,
                product_id: line.product_id,
                quantity: line.quantity,
                order_date,
            })
            .await?;

        if saved.is_none() {
            return Err(OrderError::Database(format!(
                "order row for cart line {} was not persisted",
                line.id
            )));
        }

        if uow.delete_cart_line(line.id).await? == 0 {
            return Err(OrderError::Database(format!(
                "cart line {} was already removed",
                line.id
            )));
        }
    }

    Ok(())
}

/// Commit when rows were touched, otherwise roll back and report the order
/// as unknown.
async fn finish_update(uow: Box<dyn OrderUnitOfWork>, touched: u64) -> OrderResult<()> {
    if touched == 0 {
        discard(uow).await;
        return Err(OrderError::OrdersNotFound);
    }
    uow.commit().await
}

async fn discard(uow: Box<dyn OrderUnitOfWork>) {
    if let Err(e) = uow.rollback().await {
        tracing::warn!(error = %e, "Rollback failed");
    }
}

/// The user's cart as shown to clients
#[derive(Debug, Clone, PartialEq)]
pub struct CartView {
    pub items: Vec<CartItem>,
    pub total: Decimal,
}

/// Cart workflow: add, fetch and remove lines
pub struct CartService<R: CartRepository> {
    repository: Arc<R>,
}

impl<R: CartRepository> Clone for CartService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R: CartRepository> CartService<R> {
    pub fn new(repository: R) -> Self {
        Self::from_shared(Arc::new(repository))
    }

    pub fn from_shared(repository: Arc<R>) -> Self {
        Self { repository }
    }

    #[instrument(skip(self, input), fields(user_id = input.user_id, product_id = input.product_id))]
    pub async fn add_to_cart(&self, input: AddToCartRequest) -> OrderResult<CartLine> {
        if input.validate().is_err() {
            return Err(OrderError::MissingField(messages::MISSING_FIELD.to_string()));
        }

        if !self.repository.product_exists(input.product_id).await? {
            return Err(OrderError::ProductNotFound(input.product_id));
        }

        self.repository.add(input).await
    }

    #[instrument(skip(self))]
    pub async fn fetch_cart(&self, user_id: i32) -> OrderResult<CartView> {
        if user_id == 0 {
            return Err(OrderError::MissingField("User Id missing".to_string()));
        }

        let items: Vec<CartItem> = self
            .repository
            .list_for_user(user_id)
            .await?
            .into_iter()
            .map(CartItem::from)
            .collect();
        let total = items.iter().map(|i| i.total_price).sum();

        Ok(CartView { items, total })
    }

    #[instrument(skip(self))]
    pub async fn remove_from_cart(&self, id: i32) -> OrderResult<()> {
        if !self.repository.delete(id).await? {
            return Err(OrderError::CartItemNotFound(id));
        }
        tracing::info!(cart_id = id, "Removed cart line");
        Ok(())
    }
}
