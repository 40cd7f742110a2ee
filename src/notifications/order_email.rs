// Order notification bodies
// Plain text, amounts in Kenyan shillings

use std::fmt::Write;

use crate::domain::order::{Order, OrderItem};
use crate::domain::repositories::ProductRepository;

pub const ORDER_EMAIL_SUBJECT: &str = "New Order Created";

/// Renders the admin notification for a freshly placed order
///
/// Each line shows the product's name and description when the product can
/// still be read; otherwise the raw product id. Unit prices are the prices
/// captured on the order items, not the live catalogue price.
pub async fn build_order_email_body(
    order: &Order,
    items: &[OrderItem],
    products: &dyn ProductRepository,
) -> String {
    let payment_status = if order.paid() { "Paid" } else { "Not Paid" };

    let mut body = String::from("Your order has been created successfully!\n\n");
    let _ = writeln!(body, "Order ID: {}", order.id());
    let _ = writeln!(body, "Total: Ksh.{}\n", order.total());
    let _ = writeln!(body, "Payment Status: {}", payment_status);
    body.push_str("Items:\n");

    for item in items {
        match products.find_by_id(item.product_id).await {
            Ok(Some(product)) => {
                let _ = write!(
                    body,
                    "- {}: {}\n  Quantity: {}\n  Unit Price: Ksh.{}\n",
                    product.name, product.description, item.quantity, item.price
                );
            }
            Ok(None) | Err(_) => {
                let _ = writeln!(
                    body,
                    "- Product ID: {}, Quantity: {}, Price: Ksh.{}",
                    item.product_id, item.quantity, item.price
                );
            }
        }
    }

    body
}

/// Short confirmation texted to the customer
pub fn build_order_sms(order: &Order) -> String {
    format!(
        "Your order {} has been received. Total: Ksh.{}",
        order.id(),
        order.total()
    )
}
