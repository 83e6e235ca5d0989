//! # Customer Model
//!
//! The terminal's state machine. Holds the basket, the product the
//! customer is looking at and its picture, and publishes a
//! [`CustomerEvent`] after every action.
//!
//! ## Check State
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │            verify(pn) ok                                               │
//! │  ┌─────────┐ ──────────────────► ┌───────────────────────────┐         │
//! │  │ Process │                     │ Checked(CheckedProduct)   │         │
//! │  └─────────┘ ◄────────────────── └───────────────────────────┘         │
//! │       ▲        buy / remove / reserve / verify                          │
//! │       │                                                                 │
//! │       └── buy / remove from Process: Rejected, nothing changes          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Basket Lifetime
//! ```text
//! check / search / clear ── empty it (create if absent)
//! buy                    ── create with a fresh order number if absent,
//!                           then add one unit
//! remove                 ── take one unit out, stock goes back
//! reserve                ── hand to the order processor, then drop it
//! ```
//!
//! Collaborator failures never escape: they are logged and reported as
//! [`CustomerEvent::Error`], and the model keeps its in-memory state.

use std::fmt;
use std::sync::Arc;

use kiosk_core::validation::{validate_product_no, validate_search_query};
use kiosk_core::{
    Basket, OrderError, OrderProcessor, Product, ProductImage, RemoveOutcome, StockError,
    StockReadWriter,
};
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::{debug, error, info};

use crate::events::CustomerEvent;

/// Buffered events per subscriber before the slowest one starts lagging.
const EVENT_CAPACITY: usize = 256;

pub const MSG_ENTER_PRODUCT: &str = "Enter Product Number";
pub const MSG_NEXT_CUSTOMER: &str = "Next customer";
pub const MSG_START: &str = "START only";
pub const MSG_CHECK_FIRST: &str = "Check if OK with customer first";
pub const MSG_NOT_IN_STOCK: &str = "!!! Not in stock";
pub const MSG_NO_ITEM: &str = "No item to remove or item cannot be removed";

// =============================================================================
// Check State
// =============================================================================

/// The product a customer confirmed with `verify`, held at quantity 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckedProduct {
    product: Product,
}

impl CheckedProduct {
    fn new(product: &Product) -> Self {
        CheckedProduct {
            product: product.with_quantity(1),
        }
    }

    pub fn product(&self) -> &Product {
        &self.product
    }

    pub fn product_no(&self) -> &str {
        &self.product.product_no
    }

    pub fn description(&self) -> &str {
        &self.product.description
    }
}

/// Whether a product has been confirmed for buying or removing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CheckState {
    #[default]
    Process,
    Checked(CheckedProduct),
}

impl CheckState {
    pub fn is_checked(&self) -> bool {
        matches!(self, CheckState::Checked(_))
    }
}

// =============================================================================
// Internal Failures
// =============================================================================

#[derive(Debug, Error)]
enum ActionError {
    #[error(transparent)]
    Stock(#[from] StockError),

    #[error(transparent)]
    Order(#[from] OrderError),
}

/// Result of looking a product number up.
enum Lookup {
    Found(Product),
    OutOfStock(Product),
    Unknown,
}

// =============================================================================
// Model
// =============================================================================

/// Customer terminal state machine.
///
/// ## Usage
/// ```rust,ignore
/// let mut model = CustomerModel::new(Arc::new(db.stock()), Arc::new(db.orders()));
/// let mut events = model.subscribe();
///
/// model.verify("0001").await;
/// let event = model.buy().await;   // Success("Purchased 40 inch LED HD TV")
/// model.reserve().await;           // Success("Next customer")
/// ```
pub struct CustomerModel {
    stock: Arc<dyn StockReadWriter>,
    orders: Arc<dyn OrderProcessor>,
    state: CheckState,
    basket: Option<Basket>,
    picture: Option<ProductImage>,
    events: broadcast::Sender<CustomerEvent>,
}

impl fmt::Debug for CustomerModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomerModel")
            .field("state", &self.state)
            .field("basket", &self.basket)
            .field("picture", &self.picture)
            .field("subscribers", &self.events.receiver_count())
            .finish()
    }
}

impl CustomerModel {
    /// Creates a model with an empty basket and nothing checked.
    pub fn new(stock: Arc<dyn StockReadWriter>, orders: Arc<dyn OrderProcessor>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        CustomerModel {
            stock,
            orders,
            state: CheckState::Process,
            basket: Some(Basket::new()),
            picture: None,
            events,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn basket(&self) -> Option<&Basket> {
        self.basket.as_ref()
    }

    pub fn picture(&self) -> Option<&ProductImage> {
        self.picture.as_ref()
    }

    pub fn state(&self) -> &CheckState {
        &self.state
    }

    /// Receives every event published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<CustomerEvent> {
        self.events.subscribe()
    }

    /// Publishes the start-up prompt so a fresh view has something to show.
    pub fn ask_for_update(&self) -> CustomerEvent {
        self.publish(CustomerEvent::Success(MSG_START.to_string()))
    }

    // =========================================================================
    // Actions
    // =========================================================================

    /// Looks a product up by number and shows it in an emptied basket.
    pub async fn check(&mut self, product_no: &str) -> CustomerEvent {
        let pn = product_no.trim();
        self.empty_basket();
        self.picture = None;

        let event = match self.show(pn).await {
            Ok(event) => event,
            Err(e) => self.failed("check", e),
        };

        self.publish(event)
    }

    /// Looks products up by description.
    ///
    /// Input containing `'0'` is taken to be a product number. Every match
    /// is added to the emptied basket, and the event describes the last
    /// one examined.
    pub async fn check_by_name(&mut self, name: &str) -> CustomerEvent {
        if name.contains('0') {
            return self.check(name).await;
        }

        let query = name.trim();
        self.empty_basket();
        self.picture = None;

        let event = match self.search(query).await {
            Ok(event) => event,
            Err(e) => self.failed("check_by_name", e),
        };

        self.publish(event)
    }

    /// Confirms a product for buying or removing. The basket is untouched.
    pub async fn verify(&mut self, product_no: &str) -> CustomerEvent {
        let pn = product_no.trim();
        self.state = CheckState::Process;

        let event = match self.lookup(pn).await {
            Ok(Lookup::Found(product)) => {
                let message = product.summary(&product.description);
                debug!(product_no = %pn, "Product checked");
                self.state = CheckState::Checked(CheckedProduct::new(&product));
                CustomerEvent::Success(message)
            }
            Ok(Lookup::OutOfStock(product)) => not_in_stock(&product),
            Ok(Lookup::Unknown) => unknown_product(pn),
            Err(e) => self.failed("verify", e.into()),
        };

        self.publish(event)
    }

    /// Buys one unit of the checked product.
    pub async fn buy(&mut self) -> CustomerEvent {
        let event = match std::mem::take(&mut self.state) {
            CheckState::Process => CustomerEvent::Rejected(MSG_CHECK_FIRST.to_string()),
            CheckState::Checked(checked) => match self.purchase(&checked).await {
                Ok(event) => event,
                Err(e) => self.failed("buy", e),
            },
        };

        self.publish(event)
    }

    /// Takes one unit of the checked product out of the basket and puts it
    /// back into stock.
    pub async fn remove(&mut self) -> CustomerEvent {
        let has_items = self.basket.as_ref().is_some_and(|b| !b.is_empty());

        let event = match std::mem::take(&mut self.state) {
            CheckState::Checked(checked) if has_items => match self.unbuy(&checked).await {
                Ok(event) => event,
                Err(e) => self.failed("remove", e),
            },
            _ => CustomerEvent::Rejected(MSG_NO_ITEM.to_string()),
        };

        self.publish(event)
    }

    /// Hands the basket over as an order and starts afresh.
    pub async fn reserve(&mut self) -> CustomerEvent {
        self.state = CheckState::Process;

        let event = match self.basket.take() {
            Some(basket) if !basket.is_empty() => match self.orders.new_order(&basket).await {
                Ok(order_num) => {
                    info!(order_num, lines = basket.len(), total = %basket.total(), "Basket reserved");
                    CustomerEvent::Success(MSG_NEXT_CUSTOMER.to_string())
                }
                Err(e) => self.failed("reserve", e.into()),
            },
            _ => CustomerEvent::Success(MSG_NEXT_CUSTOMER.to_string()),
        };

        self.publish(event)
    }

    /// Empties the basket and hides the picture.
    pub fn clear(&mut self) -> CustomerEvent {
        self.empty_basket();
        self.picture = None;
        self.publish(CustomerEvent::Success(MSG_ENTER_PRODUCT.to_string()))
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    async fn lookup(&self, product_no: &str) -> Result<Lookup, StockError> {
        let Ok(pn) = validate_product_no(product_no) else {
            return Ok(Lookup::Unknown);
        };

        if !self.stock.exists(pn).await? {
            return Ok(Lookup::Unknown);
        }

        let product = self.stock.get_details(pn).await?;
        Ok(match product.ensure_in_stock(1) {
            Ok(()) => Lookup::Found(product),
            Err(_) => Lookup::OutOfStock(product),
        })
    }

    async fn show(&mut self, pn: &str) -> Result<CustomerEvent, ActionError> {
        let product = match self.lookup(pn).await? {
            Lookup::Found(product) => product,
            Lookup::OutOfStock(product) => return Ok(not_in_stock(&product)),
            Lookup::Unknown => return Ok(unknown_product(pn)),
        };

        let message = product.summary(&product.description);
        let picture = self.stock.get_image(pn).await?;
        self.basket
            .get_or_insert_with(Basket::new)
            .add(product.with_quantity(1));
        self.picture = Some(picture);

        Ok(CustomerEvent::Success(message))
    }

    async fn search(&mut self, query: &str) -> Result<CustomerEvent, ActionError> {
        let unknown = format!("Unknown Product Query with the name:  {}", query);

        if validate_search_query(query).is_err() {
            return Ok(CustomerEvent::NotFound(unknown));
        }

        let products = self.stock.get_details_name(query).await?;
        debug!(query = %query, matches = products.len(), "Description search");

        let mut event = CustomerEvent::NotFound(unknown.clone());
        for product in products {
            event = if !self.stock.exists_name(&product.description).await? {
                CustomerEvent::NotFound(unknown.clone())
            } else if product.ensure_in_stock(1).is_err() {
                CustomerEvent::NotFound(format!("{} this item does not exist.", product.description))
            } else {
                let message = product.summary(&product.product_no);
                let picture = self.stock.get_image(&product.product_no).await?;
                self.basket
                    .get_or_insert_with(Basket::new)
                    .add(product.with_quantity(1));
                self.picture = Some(picture);
                CustomerEvent::Success(message)
            };
        }

        Ok(event)
    }

    async fn purchase(&mut self, checked: &CheckedProduct) -> Result<CustomerEvent, ActionError> {
        // Number first, so a failed allocation never strands bought stock
        if self.basket.is_none() {
            let order_num = self.orders.unique_number().await?;
            debug!(order_num, "New basket");
            self.basket = Some(Basket::with_order_num(order_num));
        }

        if !self.stock.buy_stock(checked.product_no(), 1).await? {
            return Ok(CustomerEvent::Rejected(MSG_NOT_IN_STOCK.to_string()));
        }

        self.basket
            .get_or_insert_with(Basket::new)
            .merge_one(checked.product());

        info!(product_no = %checked.product_no(), "Purchased");
        Ok(CustomerEvent::Success(format!("Purchased {}", checked.description())))
    }

    async fn unbuy(&mut self, checked: &CheckedProduct) -> Result<CustomerEvent, ActionError> {
        let pn = checked.product_no();
        let in_basket = self
            .basket
            .as_ref()
            .is_some_and(|b| b.items().iter().any(|p| p.product_no == pn));
        if !in_basket {
            return Ok(CustomerEvent::NotFound(MSG_NO_ITEM.to_string()));
        }

        // Stock first: if it fails the unit stays in the basket
        self.stock.add_stock(pn, 1).await?;
        let outcome = self
            .basket
            .as_mut()
            .map_or(RemoveOutcome::Missing, |b| b.remove_one(pn));

        info!(product_no = %pn, ?outcome, "Removed from basket");
        Ok(CustomerEvent::Success(format!(
            "Removed {} from the basket",
            checked.description()
        )))
    }

    /// Empties the basket, creating one if there is none.
    fn empty_basket(&mut self) {
        self.basket.get_or_insert_with(Basket::new).clear();
    }

    fn failed(&self, action: &'static str, err: ActionError) -> CustomerEvent {
        error!(action, error = %err, "Customer action failed");
        CustomerEvent::Error(err.to_string())
    }

    fn publish(&self, event: CustomerEvent) -> CustomerEvent {
        // No subscribers is fine
        let _ = self.events.send(event.clone());
        event
    }
}

fn unknown_product(pn: &str) -> CustomerEvent {
    CustomerEvent::NotFound(format!("Unknown product number {}", pn))
}

fn not_in_stock(product: &Product) -> CustomerEvent {
    CustomerEvent::NotFound(format!("{} not in stock", product.description))
}

// =============================================================================
// Unit Tests
// =============================================================================
