//! Back-in-stock notifications

use std::{cell::RefCell, fmt, rc::Rc};

use slotmap::{SlotMap, new_key_type};
use tracing::info;

use crate::{ids::ProductId, products::Product};

new_key_type! {
    /// Subscription Key
    pub struct SubscriptionKey;
}

/// A product that just came back into stock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackInStock {
    /// Product id
    pub product_id: ProductId,

    /// Product name
    pub product_name: String,

    /// Units now on hand
    pub stock_quantity: u32,
}

impl BackInStock {
    /// Build the notice for `product`.
    pub fn for_product(product: &Product<'_>) -> Self {
        Self {
            product_id: product.id.clone(),
            product_name: product.name.clone(),
            stock_quantity: product.stock_quantity,
        }
    }
}

impl fmt::Display for BackInStock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Product '{}' is back in stock!", self.product_name)
    }
}

/// Something that wants to hear when a product is restocked.
pub trait StockObserver: fmt::Debug {
    /// Called once per product each time its stock goes from zero to some.
    fn back_in_stock(&mut self, notice: &BackInStock);
}

/// Observer that writes each notice to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct StockAlertLog;

impl StockObserver for StockAlertLog {
    fn back_in_stock(&mut self, notice: &BackInStock) {
        info!(
            product_id = %notice.product_id,
            stock = notice.stock_quantity,
            "{notice}"
        );
    }
}

/// Observer collecting notice messages. Clones share the same messages.
#[derive(Debug, Clone, Default)]
pub struct Inbox {
    messages: Rc<RefCell<Vec<String>>>,
}

impl Inbox {
    /// Create an empty inbox.
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages received so far.
    pub fn messages(&self) -> Vec<String> {
        self.messages.borrow().clone()
    }

    /// Number of messages received.
    pub fn len(&self) -> usize {
        self.messages.borrow().len()
    }

    /// Whether nothing has been received yet.
    pub fn is_empty(&self) -> bool {
        self.messages.borrow().is_empty()
    }
}

impl StockObserver for Inbox {
    fn back_in_stock(&mut self, notice: &BackInStock) {
        self.messages.borrow_mut().push(notice.to_string());
    }
}

/// Registry of stock observers.
#[derive(Debug, Default)]
pub struct StockNotifier {
    observers: SlotMap<SubscriptionKey, Box<dyn StockObserver>>,
}

impl StockNotifier {
    /// Create a notifier with no observers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `observer`; the key can later be used to unsubscribe.
    pub fn subscribe(&mut self, observer: impl StockObserver + 'static) -> SubscriptionKey {
        self.observers.insert(Box::new(observer))
    }

    /// Remove a subscription. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, key: SubscriptionKey) -> bool {
        self.observers.remove(key).is_some()
    }

    /// Number of observers
    pub fn len(&self) -> usize {
        self.observers.len()
    }

    /// Whether there are no observers
    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    /// Tell every observer that `product` is back in stock.
    pub fn notify(&mut self, product: &Product<'_>) {
        let notice = BackInStock::for_product(product);

        for observer in self.observers.values_mut() {
            observer.back_in_stock(&notice);
        }
    }

    /// Notify if stock went from zero to some, comparing with `previous_stock`.
    ///
    /// Returns whether observers were notified.
    pub fn notify_if_restocked(&mut self, product: &Product<'_>, previous_stock: u32) -> bool {
        let restocked = previous_stock == 0 && product.stock_quantity > 0;

        if restocked {
            self.notify(product);
        }

        restocked
    }
}

#[cfg(test)]
mod tests {
    use crate::pricing::test_support::laptop;

    use super::*;

    #[test]
    fn notifies_only_on_zero_to_some() {
        let mut notifier = StockNotifier::new();
        let inbox = Inbox::new();
        notifier.subscribe(inbox.clone());

        let mut product = laptop(100);
        product.stock_quantity = 3;

        assert!(!notifier.notify_if_restocked(&product, 1));
        assert!(inbox.is_empty());

        assert!(notifier.notify_if_restocked(&product, 0));
        assert_eq!(inbox.messages(), ["Product 'MacBook Pro' is back in stock!"]);

        product.stock_quantity = 0;

        assert!(!notifier.notify_if_restocked(&product, 0));
        assert_eq!(inbox.len(), 1);
    }

    #[test]
    fn unsubscribed_observers_are_not_called() {
        let mut notifier = StockNotifier::new();
        let kept = Inbox::new();
        let dropped = Inbox::new();

        notifier.subscribe(kept.clone());
        let key = notifier.subscribe(dropped.clone());
        notifier.subscribe(StockAlertLog);

        assert!(notifier.unsubscribe(key));
        assert!(!notifier.unsubscribe(key));
        assert_eq!(notifier.len(), 2);

        notifier.notify(&laptop(100));

        assert_eq!(kept.len(), 1);
        assert!(dropped.is_empty());
    }
}
