use chrono::{DateTime, Local, Utc};
use rust_decimal::Decimal;
use sea_orm::sea_query::StringLen;
use sea_orm::{DeriveActiveEnum, EnumIter, FromQueryResult};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Placeholder shown for a delivery date or delivery person not yet known
pub const PENDING: &str = "Pending";

/// `dd-MM-yyyy HH:mm` in server local time, as order dates are shown to clients
pub const ORDER_DATE_FORMAT: &str = "%d-%m-%Y %H:%M";

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    Default,
    DeriveActiveEnum,
    EnumIter,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum DeliveryTime {
    /// No slot chosen yet
    #[default]
    #[sea_orm(string_value = "Default")]
    Default,
    #[sea_orm(string_value = "Morning")]
    Morning,
    #[sea_orm(string_value = "Afternoon")]
    Afternoon,
    #[sea_orm(string_value = "Evening")]
    Evening,
    #[sea_orm(string_value = "Night")]
    Night,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    Default,
    DeriveActiveEnum,
    EnumIter,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum DeliveryStatus {
    #[default]
    #[sea_orm(string_value = "Pending")]
    Pending,
    #[sea_orm(string_value = "Processing")]
    Processing,
    #[serde(rename = "On the Way")]
    #[strum(serialize = "On the Way")]
    #[sea_orm(string_value = "On the Way")]
    OnTheWay,
    #[sea_orm(string_value = "Delivered")]
    Delivered,
}

/// One order row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: i32,
    pub order_id: String,
    pub user_id: i32,
    pub product_id: i32,
    pub quantity: i32,
    pub order_date: DateTime<Utc>,
    pub delivery_date: String,
    pub delivery_time: DeliveryTime,
    pub delivery_status: DeliveryStatus,
    /// `0` while unassigned
    pub delivery_person_id: i32,
    pub delivery_assigned: bool,
}

/// An order row about to be written for one cart line
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub order_id: String,
    pub user_id: i32,
    pub product_id: i32,
    pub quantity: i32,
    pub order_date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub id: i32,
    pub user_id: i32,
    pub product_id: i32,
    pub quantity: i32,
}

/// Cart line joined with its product
#[derive(Debug, Clone, PartialEq, FromQueryResult)]
pub struct CartLineDetail {
    pub id: i32,
    pub product_id: i32,
    pub quantity: i32,
    pub product_title: String,
    pub product_image: String,
    pub product_price: Decimal,
}

/// Order row joined with its product and customer
#[derive(Debug, Clone, PartialEq, FromQueryResult)]
pub struct OrderDetail {
    pub order_id: String,
    pub user_id: i32,
    pub product_id: i32,
    pub quantity: i32,
    pub order_date: DateTime<Utc>,
    pub delivery_date: String,
    pub delivery_time: DeliveryTime,
    pub delivery_status: DeliveryStatus,
    pub delivery_person_id: i32,
    pub product_title: String,
    pub product_description: String,
    pub product_image: String,
    pub product_price: Decimal,
    pub user_first_name: String,
    pub user_last_name: String,
    pub user_phone: String,
    pub user_address: String,
}

/// Which order rows a listing covers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderScope {
    All,
    Customer(i32),
    OrderId(String),
    DeliveryPerson(i32),
}

/// New delivery schedule for every row of an order
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryUpdate {
    pub delivery_date: String,
    pub delivery_time: DeliveryTime,
    pub delivery_status: DeliveryStatus,
}

/// Name and phone of the person delivering an order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryContact {
    pub name: String,
    pub contact: String,
}

impl DeliveryContact {
    pub fn pending() -> Self {
        Self {
            name: PENDING.to_string(),
            contact: PENDING.to_string(),
        }
    }
}

/// An order row as shown to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderView {
    pub order_id: String,
    pub product_id: i32,
    pub product_name: String,
    pub product_description: String,
    pub product_image: String,
    pub quantity: i32,
    /// `dd-MM-yyyy HH:mm`
    pub order_date: String,
    /// `"<date> <time>"`; the time is left out until a slot is chosen
    pub delivery_date: String,
    pub delivery_status: DeliveryStatus,
    #[schema(value_type = String, example = "998.00")]
    pub total_price: Decimal,
    pub user_id: i32,
    pub user_name: String,
    pub user_phone: String,
    pub address: String,
    pub delivery_person_name: String,
    pub delivery_person_contact: String,
}

impl OrderView {
    pub fn from_detail(detail: OrderDetail, delivery_person: DeliveryContact) -> Self {
        let delivery_date = match detail.delivery_time {
            DeliveryTime::Default => detail.delivery_date,
            time => format!("{} {}", detail.delivery_date, time),
        };

        Self {
            total_price: Decimal::from(detail.quantity) * detail.product_price,
            order_date: detail
                .order_date
                .with_timezone(&Local)
                .format(ORDER_DATE_FORMAT)
                .to_string(),
            order_id: detail.order_id,
            product_id: detail.product_id,
            product_name: detail.product_title,
            product_description: detail.product_description,
            product_image: detail.product_image,
            quantity: detail.quantity,
            delivery_date,
            delivery_status: detail.delivery_status,
            user_id: detail.user_id,
            user_name: format!("{} {}", detail.user_first_name, detail.user_last_name),
            user_phone: detail.user_phone,
            address: detail.user_address,
            delivery_person_name: delivery_person.name,
            delivery_person_contact: delivery_person.contact,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderListResponse {
    pub orders: Vec<OrderView>,
    pub success: bool,
    pub response_message: String,
}

impl OrderListResponse {
    pub fn fetched(orders: Vec<OrderView>) -> Self {
        Self {
            orders,
            success: true,
            response_message: "Order Fetched Successful!!".to_string(),
        }
    }

    pub fn not_found() -> Self {
        Self {
            orders: Vec::new(),
            success: false,
            response_message: "Orders not found".to_string(),
        }
    }
}

/// Body of both delivery endpoints. The status update reads the schedule
/// fields, the assignment reads `deliveryId`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDeliveryStatusRequest {
    #[serde(default)]
    pub order_id: String,
    pub delivery_date: Option<String>,
    pub delivery_time: Option<DeliveryTime>,
    pub delivery_status: Option<DeliveryStatus>,
    /// Delivery person to assign
    pub delivery_id: Option<i32>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    #[serde(default)]
    #[validate(range(min = 1))]
    pub user_id: i32,
    #[serde(default)]
    #[validate(range(min = 1))]
    pub product_id: i32,
    #[serde(default)]
    #[validate(range(min = 1))]
    pub quantity: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Cart line id, used to remove the line
    pub id: i32,
    pub product_id: i32,
    pub product_name: String,
    pub product_image: String,
    #[schema(value_type = String)]
    pub unit_price: Decimal,
    pub quantity: i32,
    #[schema(value_type = String)]
    pub total_price: Decimal,
}

impl From<CartLineDetail> for CartItem {
    fn from(line: CartLineDetail) -> Self {
        Self {
            id: line.id,
            product_id: line.product_id,
            total_price: Decimal::from(line.quantity) * line.product_price,
            product_name: line.product_title,
            product_image: line.product_image,
            unit_price: line.product_price,
            quantity: line.quantity,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub cart: Vec<CartItem>,
    #[schema(value_type = String)]
    pub total_cart_price: Decimal,
    pub success: bool,
    pub response_message: String,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UserIdQuery {
    #[serde(rename = "userId")]
    pub user_id: Option<i32>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct OrderIdQuery {
    #[serde(rename = "orderId")]
    pub order_id: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DeliveryPersonQuery {
    #[serde(rename = "deliveryPersonId")]
    pub delivery_person_id: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn detail() -> OrderDetail {
        OrderDetail {
            order_id: "AB12CD34EF".into(),
            user_id: 2,
            product_id: 5,
            quantity: 3,
            order_date: Utc.with_ymd_and_hms(2025, 3, 7, 9, 5, 0).unwrap(),
            delivery_date: PENDING.into(),
            delivery_time: DeliveryTime::Default,
            delivery_status: DeliveryStatus::Pending,
            delivery_person_id: 0,
            product_title: "Mug".into(),
            product_description: "Stoneware".into(),
            product_image: "mug.png".into(),
            product_price: Decimal::new(19999, 2),
            user_first_name: "Asha".into(),
            user_last_name: "Rao".into(),
            user_phone: "9000000001".into(),
            user_address: "12 Lake Rd".into(),
        }
    }

    #[test]
    fn view_computes_exact_total_and_formats_date() {
        let view = OrderView::from_detail(detail(), DeliveryContact::pending());

        assert_eq!(view.total_price, Decimal::new(59997, 2));
        assert_eq!(view.delivery_date, "Pending");
        assert_eq!(view.user_name, "Asha Rao");
        assert_eq!(view.delivery_person_name, "Pending");
    }

    #[test]
    fn order_date_is_shown_in_server_local_time() {
        let placed = Utc.with_ymd_and_hms(2025, 3, 7, 9, 5, 0).unwrap();
        let view = OrderView::from_detail(detail(), DeliveryContact::pending());

        let expected = placed.with_timezone(&Local).format("%d-%m-%Y %H:%M").to_string();
        assert_eq!(view.order_date, expected);
    }

    #[test]
    fn delivery_date_includes_chosen_slot() {
        let mut d = detail();
        d.delivery_date = "10-03-2025".into();
        d.delivery_time = DeliveryTime::Evening;

        let view = OrderView::from_detail(d, DeliveryContact::pending());
        assert_eq!(view.delivery_date, "10-03-2025 Evening");
    }

    #[test]
    fn status_wire_names() {
        assert_eq!(
            serde_json::to_value(DeliveryStatus::OnTheWay).unwrap(),
            "On the Way"
        );
        assert_eq!(DeliveryStatus::OnTheWay.to_string(), "On the Way");
        let parsed: DeliveryStatus = serde_json::from_str("\"Delivered\"").unwrap();
        assert_eq!(parsed, DeliveryStatus::Delivered);
    }

    #[test]
    fn enums_map_to_stored_strings() {
        use sea_orm::ActiveEnum;

        assert_eq!(DeliveryStatus::OnTheWay.to_value(), "On the Way");
        assert_eq!(
            DeliveryTime::try_from_value(&"Morning".to_string()).unwrap(),
            DeliveryTime::Morning
        );
        assert!(DeliveryStatus::try_from_value(&"Lost".to_string()).is_err());
    }

    #[test]
    fn cart_item_total() {
        let item = CartItem::from(CartLineDetail {
            id: 1,
            product_id: 5,
            quantity: 4,
            product_title: "Mug".into(),
            product_image: "mug.png".into(),
            product_price: Decimal::new(1050, 2),
        });
        assert_eq!(item.total_price, Decimal::new(4200, 2));
    }
}
