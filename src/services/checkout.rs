use std::sync::Arc;
use tokio::task::JoinHandle;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::order::PlacedOrder;
use crate::domain::repositories::{CartRepository, OrderRepository, ProductRepository};
use crate::domain::user::User;
use crate::notifications::{
    build_order_email_body, build_order_sms, EmailSender, SmsSender, ORDER_EMAIL_SUBJECT,
};

/// Dispatches order notifications off the request path
#[derive(Clone)]
pub struct Notifier {
    email: Arc<dyn EmailSender>,
    sms: Arc<dyn SmsSender>,
    admin_address: Option<String>,
    products: Arc<dyn ProductRepository>,
}

impl Notifier {
    pub fn new(
        email: Arc<dyn EmailSender>,
        sms: Arc<dyn SmsSender>,
        admin_address: Option<String>,
        products: Arc<dyn ProductRepository>,
    ) -> Self {
        Self {
            email,
            sms,
            admin_address,
            products,
        }
    }

    /// Emails the admin and texts the customer on a background task
    ///
    /// Delivery failures are logged and never reach the caller.
    pub fn order_placed(&self, placed: &PlacedOrder, customer: &User) -> JoinHandle<()> {
        let notifier = self.clone();
        let placed = placed.clone();
        let phone = customer.phone.clone();

        tokio::spawn(async move {
            let order_id = placed.order.id();

            match notifier.admin_address.as_deref() {
                Some(admin) => {
                    let body = build_order_email_body(
                        &placed.order,
                        &placed.items,
                        notifier.products.as_ref(),
                    )
                    .await;
                    if let Err(e) = notifier
                        .email
                        .send_email(admin, ORDER_EMAIL_SUBJECT, &body)
                        .await
                    {
                        tracing::warn!(%order_id, error = %e, "Failed to send order email");
                    }
                }
                None => tracing::debug!(%order_id, "No admin address; order email skipped"),
            }

            if let Some(phone) = phone {
                let message = build_order_sms(&placed.order);
                if let Err(e) = notifier.sms.send_sms(&phone, &message).await {
                    tracing::warn!(%order_id, error = %e, "Failed to send order SMS");
                }
            }
        })
    }
}

/// Turns a user's cart into an order
#[derive(Clone)]
pub struct CheckoutService {
    carts: Arc<dyn CartRepository>,
    orders: Arc<dyn OrderRepository>,
    notifier: Notifier,
}

impl CheckoutService {
    pub fn new(
        carts: Arc<dyn CartRepository>,
        orders: Arc<dyn OrderRepository>,
        notifier: Notifier,
    ) -> Self {
        Self {
            carts,
            orders,
            notifier,
        }
    }

    /// Places an order for everything in the user's cart
    ///
    /// Order creation, item creation and clearing the cart happen atomically
    /// in the repository. Notifications are dispatched afterwards and do not
    /// affect the result.
    ///
    /// # Errors
    /// * `DomainError::NoCart` - the user never created a cart
    /// * `DomainError::EmptyCart` - the cart has no items
    pub async fn place_order(&self, user: &User) -> DomainResult<PlacedOrder> {
        let cart = self
            .carts
            .find_by_user(user.id)
            .await?
            .ok_or(DomainError::NoCart)?;

        let placed = self.orders.place_order(cart.id, user.id).await?;
        tracing::info!(
            order_id = %placed.order.id(),
            user_id = %user.id,
            total = placed.order.total(),
            items = placed.items.len(),
            "Order placed"
        );

        self.notifier.order_placed(&placed, user);
        Ok(placed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::{NewProduct, Product};
    use crate::domain::order::OrderStatus;
    use crate::domain::repositories::CartItemRepository;
    use crate::domain::user::Email;
    use crate::infrastructure::repositories::InMemoryStore;
    use crate::notifications::NotificationError;
    use crate::services::CartService;
    use async_trait::async_trait;
    use std::time::Duration;
    use tokio::sync::mpsc;

    #[derive(Clone)]
    struct ChannelSender(mpsc::UnboundedSender<(String, String)>);

    #[async_trait]
    impl EmailSender for ChannelSender {
        async fn send_email(
            &self,
            to: &str,
            _subject: &str,
            body: &str,
        ) -> Result<(), NotificationError> {
            let _ = self.0.send((to.to_string(), body.to_string()));
            Ok(())
        }
    }

    #[async_trait]
    impl SmsSender for ChannelSender {
        async fn send_sms(&self, to: &str, message: &str) -> Result<(), NotificationError> {
            let _ = self.0.send((to.to_string(), message.to_string()));
            Ok(())
        }
    }

    struct FailingSender;

    #[async_trait]
    impl EmailSender for FailingSender {
        async fn send_email(&self, _: &str, _: &str, _: &str) -> Result<(), NotificationError> {
            Err(NotificationError::Rejected("down".to_string()))
        }
    }

    #[async_trait]
    impl SmsSender for FailingSender {
        async fn send_sms(&self, _: &str, _: &str) -> Result<(), NotificationError> {
            Err(NotificationError::Rejected("down".to_string()))
        }
    }

    struct Fixture {
        store: Arc<InMemoryStore>,
        cart: CartService,
        checkout: CheckoutService,
        user: User,
    }

    fn fixture(email: Arc<dyn EmailSender>, sms: Arc<dyn SmsSender>) -> Fixture {
        let store = Arc::new(InMemoryStore::new());
        let notifier = Notifier::new(
            email,
            sms,
            Some("admin@shop.test".to_string()),
            store.clone(),
        );
        let mut user = User::provision(
            "oidc|7",
            "Ada",
            Email::new("ada@example.test").unwrap(),
        );
        user.phone = Some("+254700000000".to_string());

        Fixture {
            cart: CartService::new(store.clone(), store.clone(), store.clone()),
            checkout: CheckoutService::new(store.clone(), store.clone(), notifier),
            store,
            user,
        }
    }

    async fn seed_product(store: &InMemoryStore, name: &str, price: i64) -> Product {
        let product = Product::new(NewProduct {
            category_id: uuid::Uuid::new_v4(),
            name: name.to_string(),
            description: String::new(),
            price,
            stock: 5,
        })
        .unwrap();
        ProductRepository::create(store, &product).await.unwrap();
        product
    }

    #[tokio::test]
    async fn checkout_creates_pending_order_and_empties_cart() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let sender = Arc::new(ChannelSender(tx));
        let f = fixture(sender.clone(), sender);
        let atlas = seed_product(&f.store, "atlas", 500).await;
        f.cart.add_item(f.user.id, atlas.id, 2).await.unwrap();

        let placed = f.checkout.place_order(&f.user).await.unwrap();

        assert_eq!(placed.order.total(), 1000);
        assert_eq!(placed.order.status(), OrderStatus::Pending);
        assert!(!placed.order.paid());
        assert_eq!(placed.items.len(), 1);
        assert_eq!(placed.items[0].price, 500);

        let cart = CartRepository::find_by_user(f.store.as_ref(), f.user.id)
            .await
            .unwrap()
            .unwrap();
        assert!(CartItemRepository::list(f.store.as_ref(), cart.id)
            .await
            .unwrap()
            .is_empty());
        assert_eq!(f.store.order_count().await, 1);
    }

    #[tokio::test]
    async fn no_cart_and_empty_cart_create_nothing() {
        let f = fixture(Arc::new(FailingSender), Arc::new(FailingSender));

        let missing = f.checkout.place_order(&f.user).await;
        assert_eq!(missing.unwrap_err(), DomainError::NoCart);

        let atlas = seed_product(&f.store, "atlas", 500).await;
        let item = f.cart.add_item(f.user.id, atlas.id, 1).await.unwrap();
        f.cart.remove_item(f.user.id, item.id).await.unwrap();

        let empty = f.checkout.place_order(&f.user).await;
        assert_eq!(empty.unwrap_err(), DomainError::EmptyCart);
        assert_eq!(f.store.order_count().await, 0);
        assert_eq!(f.store.order_item_count().await, 0);
    }

    #[tokio::test]
    async fn second_checkout_of_same_cart_fails() {
        let f = fixture(Arc::new(FailingSender), Arc::new(FailingSender));
        let atlas = seed_product(&f.store, "atlas", 500).await;
        f.cart.add_item(f.user.id, atlas.id, 1).await.unwrap();

        let (first, second) = tokio::join!(
            f.checkout.place_order(&f.user),
            f.checkout.place_order(&f.user)
        );

        assert_eq!(first.is_ok() as u8 + second.is_ok() as u8, 1);
        assert_eq!(f.store.order_count().await, 1);
    }

    #[tokio::test]
    async fn admin_email_and_customer_sms_are_sent() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let sender = Arc::new(ChannelSender(tx));
        let f = fixture(sender.clone(), sender);
        let atlas = seed_product(&f.store, "atlas", 250).await;
        f.cart.add_item(f.user.id, atlas.id, 4).await.unwrap();

        let placed = f.checkout.place_order(&f.user).await.unwrap();

        let mut received = Vec::new();
        for _ in 0..2 {
            let message = tokio::time::timeout(Duration::from_secs(1), rx.recv())
                .await
                .expect("notification in time")
                .expect("channel open");
            received.push(message);
        }

        let (_, email_body) = received
            .iter()
            .find(|(to, _)| to == "admin@shop.test")
            .expect("admin email");
        assert!(email_body.contains(&placed.order.id().to_string()));
        assert!(email_body.contains("Total: Ksh.1000"));
        assert!(received.iter().any(|(to, _)| to == "+254700000000"));
    }

    #[tokio::test]
    async fn notification_failure_does_not_fail_checkout() {
        let f = fixture(Arc::new(FailingSender), Arc::new(FailingSender));
        let atlas = seed_product(&f.store, "atlas", 500).await;
        f.cart.add_item(f.user.id, atlas.id, 1).await.unwrap();

        let placed = f.checkout.place_order(&f.user).await.unwrap();
        let delivery = f
            .checkout
            .notifier
            .order_placed(&placed, &f.user);

        assert!(delivery.await.is_ok());
        assert_eq!(f.store.order_count().await, 1);
    }
}
