use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::types::Json;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::{
    documents::{SingletonKind, StoredDocument},
    models::{
        AdminRecord, CreateOrderRequest, CreatePortfolioRequest, CreateServiceRequest,
        DashboardStats, Order, OrderStatus, PortfolioImage, Service, UpdateOrderRequest,
        UpdatePortfolioRequest, UpdateServiceRequest,
    },
    repository::{Repository, RepositoryError},
};

#[derive(Default)]
struct Store {
    services: Vec<Service>,
    orders: Vec<Order>,
    portfolio: Vec<PortfolioImage>,
    admins: Vec<AdminRecord>,
    documents: HashMap<SingletonKind, StoredDocument>,
}

/// InMemoryRepository
///
/// Process-local [`Repository`] used for local runs without `DATABASE_URL` and by the
/// test suites. All state sits behind one mutex, so every operation is atomic with
/// respect to the others.
#[derive(Default)]
pub struct InMemoryRepository {
    store: Mutex<Store>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn newest_first<T>(items: &[T], created_at: impl Fn(&T) -> chrono::DateTime<Utc>) -> Vec<T>
where
    T: Clone,
{
    let mut sorted = items.to_vec();
    sorted.sort_by_key(|item| std::cmp::Reverse(created_at(item)));
    sorted
}

fn remove_by_id<T>(items: &mut Vec<T>, id: Uuid, key: impl Fn(&T) -> Uuid) -> bool {
    let before = items.len();
    items.retain(|item| key(item) != id);
    items.len() != before
}

fn insert_admin(
    store: &mut Store,
    username: &str,
    email: &str,
    password_hash: &str,
) -> Result<AdminRecord, RepositoryError> {
    if store
        .admins
        .iter()
        .any(|a| a.email == email || a.username == username)
    {
        return Err(RepositoryError::Conflict("Admin already exists".to_string()));
    }
    let now = Utc::now();
    let admin = AdminRecord {
        id: Uuid::new_v4(),
        username: username.to_string(),
        email: email.to_string(),
        password_hash: password_hash.to_string(),
        created_at: now,
        updated_at: now,
    };
    store.admins.push(admin.clone());
    Ok(admin)
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn list_services(&self) -> Result<Vec<Service>, RepositoryError> {
        let store = self.store.lock().await;
        Ok(newest_first(&store.services, |s| s.created_at))
    }

    async fn get_service(&self, id: Uuid) -> Result<Option<Service>, RepositoryError> {
        let store = self.store.lock().await;
        Ok(store.services.iter().find(|s| s.id == id).cloned())
    }

    async fn create_service(&self, req: CreateServiceRequest) -> Result<Service, RepositoryError> {
        let now = Utc::now();
        let service = Service {
            id: Uuid::new_v4(),
            name: req.name,
            description: req.description,
            price: req.price.unwrap_or_default(),
            images: req.images,
            details: req.details,
            created_at: now,
            updated_at: now,
        };
        self.store.lock().await.services.push(service.clone());
        Ok(service)
    }

    async fn update_service(
        &self,
        id: Uuid,
        req: UpdateServiceRequest,
    ) -> Result<Option<Service>, RepositoryError> {
        let mut store = self.store.lock().await;
        let Some(service) = store.services.iter_mut().find(|s| s.id == id) else {
            return Ok(None);
        };
        if let Some(name) = req.name {
            service.name = name;
        }
        if let Some(description) = req.description {
            service.description = description;
        }
        if let Some(price) = req.price {
            service.price = price;
        }
        if let Some(images) = req.images {
            service.images = images;
        }
        if let Some(details) = req.details {
            service.details = details;
        }
        service.updated_at = Utc::now();
        Ok(Some(service.clone()))
    }

    async fn delete_service(&self, id: Uuid) -> Result<bool, RepositoryError> {
        let mut store = self.store.lock().await;
        Ok(remove_by_id(&mut store.services, id, |s| s.id))
    }

    async fn list_orders(&self) -> Result<Vec<Order>, RepositoryError> {
        let store = self.store.lock().await;
        Ok(newest_first(&store.orders, |o| o.created_at))
    }

    async fn get_order(&self, id: Uuid) -> Result<Option<Order>, RepositoryError> {
        let store = self.store.lock().await;
        Ok(store.orders.iter().find(|o| o.id == id).cloned())
    }

    async fn create_order(&self, req: CreateOrderRequest) -> Result<Order, RepositoryError> {
        let now = Utc::now();
        let order = Order {
            id: Uuid::new_v4(),
            full_name: req.full_name,
            email: req.email,
            phone: req.phone,
            address: req.address,
            service_id: req.service_id,
            service_name: req.service_name,
            notes: req.notes.unwrap_or_default(),
            status: req.status.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        };
        self.store.lock().await.orders.push(order.clone());
        Ok(order)
    }

    async fn update_order(
        &self,
        id: Uuid,
        req: UpdateOrderRequest,
    ) -> Result<Option<Order>, RepositoryError> {
        let mut store = self.store.lock().await;
        let Some(order) = store.orders.iter_mut().find(|o| o.id == id) else {
            return Ok(None);
        };
        if let Some(status) = req.status {
            order.status = status;
        }
        if let Some(notes) = req.notes {
            order.notes = notes;
        }
        order.updated_at = Utc::now();
        Ok(Some(order.clone()))
    }

    async fn delete_order(&self, id: Uuid) -> Result<bool, RepositoryError> {
        let mut store = self.store.lock().await;
        Ok(remove_by_id(&mut store.orders, id, |o| o.id))
    }

    async fn list_portfolio(&self) -> Result<Vec<PortfolioImage>, RepositoryError> {
        let store = self.store.lock().await;
        let mut images = store.portfolio.clone();
        images.sort_by(|a, b| {
            a.order
                .cmp(&b.order)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        Ok(images)
    }

    async fn create_portfolio_image(
        &self,
        req: CreatePortfolioRequest,
    ) -> Result<PortfolioImage, RepositoryError> {
        let now = Utc::now();
        let image = PortfolioImage {
            id: Uuid::new_v4(),
            image_url: req.image_url,
            title: req.title.unwrap_or_default(),
            description: req.description.unwrap_or_default(),
            order: req.order.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        };
        self.store.lock().await.portfolio.push(image.clone());
        Ok(image)
    }

    async fn update_portfolio_image(
        &self,
        id: Uuid,
        req: UpdatePortfolioRequest,
    ) -> Result<Option<PortfolioImage>, RepositoryError> {
        let mut store = self.store.lock().await;
        let Some(image) = store.portfolio.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        if let Some(url) = req.image_url {
            image.image_url = url;
        }
        if let Some(title) = req.title {
            image.title = title;
        }
        if let Some(description) = req.description {
            image.description = description;
        }
        if let Some(order) = req.order {
            image.order = order;
        }
        image.updated_at = Utc::now();
        Ok(Some(image.clone()))
    }

    async fn delete_portfolio_image(&self, id: Uuid) -> Result<bool, RepositoryError> {
        let mut store = self.store.lock().await;
        Ok(remove_by_id(&mut store.portfolio, id, |p| p.id))
    }

    async fn count_admins(&self) -> Result<i64, RepositoryError> {
        Ok(self.store.lock().await.admins.len() as i64)
    }

    async fn find_admin(&self, id: Uuid) -> Result<Option<AdminRecord>, RepositoryError> {
        let store = self.store.lock().await;
        Ok(store.admins.iter().find(|a| a.id == id).cloned())
    }

    async fn find_admin_by_email(
        &self,
        email: &str,
    ) -> Result<Option<AdminRecord>, RepositoryError> {
        let store = self.store.lock().await;
        Ok(store.admins.iter().find(|a| a.email == email).cloned())
    }

    async fn create_admin(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<AdminRecord, RepositoryError> {
        let mut store = self.store.lock().await;
        insert_admin(&mut store, username, email, password_hash)
    }

    async fn create_first_admin(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<Option<AdminRecord>, RepositoryError> {
        let mut store = self.store.lock().await;
        if !store.admins.is_empty() {
            return Ok(None);
        }
        insert_admin(&mut store, username, email, password_hash).map(Some)
    }

    async fn list_admins(&self) -> Result<Vec<AdminRecord>, RepositoryError> {
        let store = self.store.lock().await;
        Ok(newest_first(&store.admins, |a| a.created_at))
    }

    async fn get_stats(&self) -> Result<DashboardStats, RepositoryError> {
        let store = self.store.lock().await;
        let pending_orders = store
            .orders
            .iter()
            .filter(|o| o.status == OrderStatus::Pending)
            .count();
        Ok(DashboardStats {
            total_services: store.services.len() as i64,
            total_orders: store.orders.len() as i64,
            pending_orders: pending_orders as i64,
        })
    }

    async fn find_document(
        &self,
        kind: SingletonKind,
    ) -> Result<Option<StoredDocument>, RepositoryError> {
        Ok(self.store.lock().await.documents.get(&kind).cloned())
    }

    async fn insert_document_if_absent(
        &self,
        kind: SingletonKind,
        body: serde_json::Value,
    ) -> Result<StoredDocument, RepositoryError> {
        let mut store = self.store.lock().await;
        let document = store.documents.entry(kind).or_insert_with(|| {
            tracing::info!(kind = kind.as_str(), "seeded default document");
            let now = Utc::now();
            StoredDocument {
                id: Uuid::new_v4(),
                body: Json(body),
                created_at: now,
                updated_at: now,
            }
        });
        Ok(document.clone())
    }

    async fn replace_document(
        &self,
        kind: SingletonKind,
        body: serde_json::Value,
    ) -> Result<StoredDocument, RepositoryError> {
        let mut store = self.store.lock().await;
        let now = Utc::now();
        let document = store
            .documents
            .entry(kind)
            .and_modify(|doc| {
                doc.body = Json(body.clone());
                doc.updated_at = now;
            })
            .or_insert_with(|| StoredDocument {
                id: Uuid::new_v4(),
                body: Json(body),
                created_at: now,
                updated_at: now,
            });
        Ok(document.clone())
    }
}
