//! # Customer Controller
//!
//! Forwards the front end's named actions to the model. Holds no state of
//! its own; the model sits behind an async mutex so one action runs at a
//! time, and clones of the controller share the same model.

use std::sync::Arc;

use kiosk_core::{Basket, ProductImage};
use tokio::sync::{broadcast, Mutex};
use tracing::debug;

use crate::events::CustomerEvent;
use crate::model::{CheckState, CustomerModel};

#[derive(Debug, Clone)]
pub struct CustomerController {
    model: Arc<Mutex<CustomerModel>>,
}

impl CustomerController {
    pub fn new(model: CustomerModel) -> Self {
        CustomerController {
            model: Arc::new(Mutex::new(model)),
        }
    }

    pub async fn check(&self, product_no: &str) -> CustomerEvent {
        debug!(product_no = %product_no, "check");
        self.model.lock().await.check(product_no).await
    }

    pub async fn search(&self, name: &str) -> CustomerEvent {
        debug!(name = %name, "search");
        self.model.lock().await.check_by_name(name).await
    }

    pub async fn verify(&self, product_no: &str) -> CustomerEvent {
        debug!(product_no = %product_no, "verify");
        self.model.lock().await.verify(product_no).await
    }

    pub async fn buy(&self) -> CustomerEvent {
        self.model.lock().await.buy().await
    }

    pub async fn remove(&self) -> CustomerEvent {
        self.model.lock().await.remove().await
    }

    pub async fn reserve(&self) -> CustomerEvent {
        self.model.lock().await.reserve().await
    }

    pub async fn clear(&self) -> CustomerEvent {
        self.model.lock().await.clear()
    }

    pub async fn ask_for_update(&self) -> CustomerEvent {
        self.model.lock().await.ask_for_update()
    }

    pub async fn subscribe(&self) -> broadcast::Receiver<CustomerEvent> {
        self.model.lock().await.subscribe()
    }

    /// Copy of the current basket, for display.
    pub async fn basket(&self) -> Option<Basket> {
        self.model.lock().await.basket().cloned()
    }

    /// Copy of the current picture, for display.
    pub async fn picture(&self) -> Option<ProductImage> {
        self.model.lock().await.picture().cloned()
    }

    pub async fn state(&self) -> CheckState {
        self.model.lock().await.state().clone()
    }
}
