//! MongoDB ledger tests against a live server.
//!
//! Set `MONGODB_URI` to run them; each test works in its own throwaway
//! database. Without it they return early.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use fruitstand_client::ApiClient;
use fruitstand_common::catalog::Catalog;
use fruitstand_common::purchase::{PurchaseItem, PurchaseRequest};
use fruitstand_server::ledger::{MongoLedger, PurchaseLedger};
use fruitstand_server::{StandError, StandService};
use mongodb::bson::{doc, oid::ObjectId, DateTime, Document};

struct TestDb {
    uri: String,
    name: String,
    ledger: Arc<MongoLedger>,
}

impl TestDb {
    /// `None` when no MongoDB is configured.
    async fn open(label: &str) -> Option<Self> {
        tracing_subscriber::fmt::try_init().ok();
        let Ok(uri) = std::env::var("MONGODB_URI") else {
            println!("MONGODB_URI not set; skipping {label}");
            return None;
        };
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .subsec_nanos();
        let name = format!("fruitstand_test_{}_{}_{}", label, std::process::id(), nanos);
        let ledger = MongoLedger::connect(&uri, Some(&name)).await.unwrap();
        Some(Self {
            uri,
            name,
            ledger: Arc::new(ledger),
        })
    }

    fn service(&self) -> StandService {
        StandService::new(Catalog::default(), self.ledger.clone())
    }

    async fn database(&self) -> mongodb::Database {
        mongodb::Client::with_uri_str(&self.uri)
            .await
            .unwrap()
            .database(&self.name)
    }

    async fn cleanup(self) {
        self.database().await.drop().await.unwrap();
    }
}

fn request(items: &[(&str, u32)], total_price: f64) -> PurchaseRequest {
    PurchaseRequest {
        items: items
            .iter()
            .map(|(fruit, quantity)| PurchaseItem {
                fruit: fruit.to_string(),
                quantity: *quantity,
            })
            .collect(),
        total_price,
    }
}

#[tokio::test]
async fn purchase_reduces_stored_inventory() {
    let Some(db) = TestDb::open("reduce").await else {
        return;
    };
    let service = db.service();
    assert_eq!(db.ledger.backend(), "mongodb");

    let saved = service
        .submit_purchase(request(&[("apple", 10)], 20.0))
        .await
        .unwrap();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].price, 2.0);
    assert_eq!(saved[0].total_price, 20.0);
    assert_eq!(saved[0].id.0.len(), 24);

    let inventory = service.inventory().await.unwrap();
    assert_eq!(inventory.count("apple"), Some(90));
    assert_eq!(inventory.count("banana"), Some(100));
    db.cleanup().await;
}

#[tokio::test]
async fn history_is_newest_first() {
    let Some(db) = TestDb::open("history").await else {
        return;
    };
    let service = db.service();
    for fruit in ["apple", "banana", "pear"] {
        service
            .submit_purchase(request(&[(fruit, 1)], 1.0))
            .await
            .unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }

    let history = service.purchases().await.unwrap();
    assert_eq!(history.len(), 3);
    assert!(history
        .windows(2)
        .all(|pair| pair[0].timestamp >= pair[1].timestamp));
    assert_eq!(history[0].fruit, "pear");
    db.cleanup().await;
}

#[tokio::test]
async fn overselling_goes_negative() {
    let Some(db) = TestDb::open("oversell").await else {
        return;
    };
    let service = db.service();
    service
        .submit_purchase(request(&[("orange", 60), ("orange", 60)], 216.0))
        .await
        .unwrap();
    assert_eq!(service.inventory().await.unwrap().count("orange"), Some(-20));
    db.cleanup().await;
}

#[tokio::test]
async fn unknown_fruit_keeps_earlier_lines() {
    let Some(db) = TestDb::open("unknown").await else {
        return;
    };
    let service = db.service();
    let err = service
        .submit_purchase(request(&[("pear", 2), ("kiwi", 1), ("apple", 1)], 4.6))
        .await
        .unwrap_err();
    assert!(matches!(err, StandError::PartialWrite { committed: 1, .. }));

    let history = service.purchases().await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].fruit, "pear");
    assert_eq!(service.inventory().await.unwrap().count("apple"), Some(100));
    db.cleanup().await;
}

#[tokio::test]
async fn bad_document_does_not_break_history_route() {
    let Some(db) = TestDb::open("baddoc").await else {
        return;
    };
    let service = Arc::new(db.service());
    service
        .submit_purchase(request(&[("banana", 4)], 6.0))
        .await
        .unwrap();
    db.database()
        .await
        .collection::<Document>("purchases")
        .insert_one(doc! {
            "_id": ObjectId::new(),
            "fruit": "banana",
            "quantity": -2_i32,
            "totalPrice": 0.0,
            "timestamp": DateTime::now(),
        })
        .await
        .unwrap();

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let api = ApiClient::with_base_url(format!("http://{}", listener.local_addr().unwrap()));
    tokio::spawn(fruitstand_server::serve(listener, service));

    let history = api.purchases().await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].quantity, 4);
    db.cleanup().await;
}
