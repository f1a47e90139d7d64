use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use fruitstand_common::inventory::FruitTotal;
use fruitstand_common::purchase::{NewPurchase, PurchaseId, PurchaseRecord};
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{self, doc, Bson, Document};
use mongodb::{Client, Collection};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use super::{LedgerError, PurchaseLedger};

const DEFAULT_DATABASE: &str = "fruitstand";
const COLLECTION: &str = "purchases";

/// Stored shape of a purchase in the `purchases` collection.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PurchaseDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    id: Option<ObjectId>,
    fruit: String,
    quantity: i64,
    total_price: f64,
    /// Absent on documents written before unit prices were stored.
    #[serde(default)]
    price: f64,
    timestamp: bson::DateTime,
}

impl PurchaseDocument {
    fn into_record(self) -> Result<PurchaseRecord, LedgerError> {
        let id = self
            .id
            .ok_or_else(|| LedgerError::Corrupt("purchase without _id".to_string()))?;
        let quantity = u32::try_from(self.quantity).map_err(|_| {
            LedgerError::Corrupt(format!("purchase {id} has quantity {}", self.quantity))
        })?;
        let timestamp = DateTime::<Utc>::from_timestamp_millis(self.timestamp.timestamp_millis())
            .ok_or_else(|| LedgerError::Corrupt(format!("purchase {id} has bad timestamp")))?;
        Ok(PurchaseRecord {
            id: PurchaseId(id.to_hex()),
            fruit: self.fruit,
            quantity,
            total_price: self.total_price,
            price: self.price,
            timestamp,
        })
    }
}

/// Ledger backed by a MongoDB collection.
#[derive(Debug, Clone)]
pub struct MongoLedger {
    purchases: Collection<PurchaseDocument>,
}

impl MongoLedger {
    /// Open the `purchases` collection in `database`, or the database named
    /// in the URI, or `fruitstand`.
    ///
    /// Fails only when the URI cannot be used. An unreachable server is logged
    /// and the driver keeps retrying on each operation.
    pub async fn connect(uri: &str, database: Option<&str>) -> Result<Self, LedgerError> {
        let client = Client::with_uri_str(uri).await?;
        let db = match database {
            Some(name) => client.database(name),
            None => client
                .default_database()
                .unwrap_or_else(|| client.database(DEFAULT_DATABASE)),
        };

        match db.run_command(doc! { "ping": 1 }).await {
            Ok(_) => info!("Connected to MongoDB (database {})", db.name()),
            Err(e) => error!("Failed to connect to MongoDB: {}", e),
        }

        Ok(Self {
            purchases: db.collection(COLLECTION),
        })
    }
}

/// Decode raw history documents. Any that cannot form a record is logged and
/// left out.
fn decode_purchases(documents: Vec<Document>) -> Vec<PurchaseRecord> {
    documents
        .into_iter()
        .filter_map(|raw| {
            let id = raw.get("_id").cloned();
            let decoded = bson::from_document::<PurchaseDocument>(raw)
                .map_err(|e| LedgerError::Corrupt(e.to_string()))
                .and_then(PurchaseDocument::into_record);
            match decoded {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!(id = ?id, "Skipping purchase document: {}", e);
                    None
                }
            }
        })
        .collect()
}

fn group_total(group: &Document) -> Result<FruitTotal, LedgerError> {
    let fruit = group
        .get_str("_id")
        .map_err(|e| LedgerError::Corrupt(format!("group key: {e}")))?
        .to_string();
    let quantity = match group.get("totalQuantity") {
        Some(Bson::Int32(n)) => i64::from(*n),
        Some(Bson::Int64(n)) => *n,
        Some(Bson::Double(n)) if n.fract() == 0.0 => *n as i64,
        Some(Bson::Double(n)) => {
            warn!(fruit = %fruit, total = *n, "Fractional purchase total rounded");
            n.round() as i64
        }
        other => {
            return Err(LedgerError::Corrupt(format!(
                "total quantity for '{fruit}': {other:?}"
            )))
        }
    };
    Ok(FruitTotal { fruit, quantity })
}

#[async_trait]
impl PurchaseLedger for MongoLedger {
    fn backend(&self) -> &'static str {
        "mongodb"
    }

    async fn append(&self, purchase: NewPurchase) -> Result<PurchaseRecord, LedgerError> {
        let timestamp = Utc::now();
        let mut document = PurchaseDocument {
            id: None,
            fruit: purchase.fruit,
            quantity: i64::from(purchase.quantity),
            total_price: purchase.total_price,
            price: purchase.price,
            timestamp: bson::DateTime::from_millis(timestamp.timestamp_millis()),
        };
        let result = self.purchases.insert_one(&document).await?;
        let id = result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| LedgerError::Corrupt("insert returned non-ObjectId".to_string()))?;
        document.id = Some(id);
        document.into_record()
    }

    async fn newest_first(&self) -> Result<Vec<PurchaseRecord>, LedgerError> {
        let documents: Vec<Document> = self
            .purchases
            .clone_with_type::<Document>()
            .find(doc! {})
            .sort(doc! { "timestamp": -1 })
            .await?
            .try_collect()
            .await?;
        Ok(decode_purchases(documents))
    }

    async fn quantities_by_fruit(&self) -> Result<Vec<FruitTotal>, LedgerError> {
        let pipeline = vec![doc! {
            "$group": {
                "_id": "$fruit",
                "totalQuantity": { "$sum": "$quantity" },
            }
        }];
        let groups: Vec<Document> = self.purchases.aggregate(pipeline).await?.try_collect().await?;
        groups.iter().map(group_total).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_total_accepts_numeric_kinds() {
        let int32 = doc! { "_id": "apple", "totalQuantity": 10_i32 };
        let int64 = doc! { "_id": "pear", "totalQuantity": 7_i64 };
        let double = doc! { "_id": "banana", "totalQuantity": 3.0 };
        assert_eq!(group_total(&int32).unwrap().quantity, 10);
        assert_eq!(group_total(&int64).unwrap().quantity, 7);
        assert_eq!(group_total(&double).unwrap().fruit, "banana");
        assert_eq!(group_total(&double).unwrap().quantity, 3);
    }

    #[test]
    fn test_group_total_rounds_fractional_double() {
        let up = doc! { "_id": "apple", "totalQuantity": 2.6 };
        let down = doc! { "_id": "pear", "totalQuantity": 4.4 };
        assert_eq!(group_total(&up).unwrap().quantity, 3);
        assert_eq!(group_total(&down).unwrap().quantity, 4);
    }

    #[test]
    fn test_history_skips_undecodable_documents() {
        let good = ObjectId::new();
        let documents = vec![
            doc! {
                "_id": good,
                "fruit": "apple",
                "quantity": 10_i32,
                "totalPrice": 20.0,
                "price": 2.0,
                "timestamp": bson::DateTime::from_millis(2_000),
            },
            doc! {
                "_id": ObjectId::new(),
                "fruit": "apple",
                "quantity": -3_i32,
                "totalPrice": 0.0,
                "timestamp": bson::DateTime::from_millis(1_500),
            },
            doc! {
                "_id": ObjectId::new(),
                "fruit": "banana",
                "quantity": "lots",
                "totalPrice": 1.5,
                "timestamp": bson::DateTime::from_millis(1_000),
            },
            doc! { "fruit": "pear" },
        ];
        let records = decode_purchases(documents);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, PurchaseId(good.to_hex()));
        assert_eq!(records[0].quantity, 10);
    }

    #[test]
    fn test_group_total_rejects_missing_fields() {
        assert!(group_total(&doc! { "totalQuantity": 1 }).is_err());
        assert!(group_total(&doc! { "_id": "apple" }).is_err());
    }

    #[test]
    fn test_document_into_record() {
        let id = ObjectId::new();
        let document = PurchaseDocument {
            id: Some(id),
            fruit: "apple".to_string(),
            quantity: 10,
            total_price: 20.0,
            price: 2.0,
            timestamp: bson::DateTime::from_millis(1_700_000_000_000),
        };
        let record = document.into_record().unwrap();
        assert_eq!(record.id, PurchaseId(id.to_hex()));
        assert_eq!(record.quantity, 10);
        assert_eq!(record.timestamp.timestamp_millis(), 1_700_000_000_000);
    }

    #[test]
    fn test_legacy_document_without_price() {
        let raw = doc! {
            "_id": ObjectId::new(),
            "fruit": "pear",
            "quantity": 2_i32,
            "totalPrice": 4.6,
            "timestamp": bson::DateTime::from_millis(0),
        };
        let document: PurchaseDocument = bson::from_document(raw).unwrap();
        assert_eq!(document.price, 0.0);
        assert_eq!(document.quantity, 2);
    }

    #[test]
    fn test_negative_quantity_is_corrupt() {
        let document = PurchaseDocument {
            id: Some(ObjectId::new()),
            fruit: "apple".to_string(),
            quantity: -1,
            total_price: 0.0,
            price: 2.0,
            timestamp: bson::DateTime::from_millis(0),
        };
        assert!(matches!(
            document.into_record(),
            Err(LedgerError::Corrupt(_))
        ));
    }
}
