use anyhow::Result;
use futures::TryStreamExt;
use mongodb::options::{FindOneAndUpdateOptions, IndexOptions, ReturnDocument};
use mongodb::{bson::doc, Collection, Database, IndexModel};

use crate::models::{Payment, PaymentStatus, Role, User};

/// User and role persistence. Balance mutations go through the atomic
/// `$inc`-based operations below; there is no read-modify-write anywhere.
#[derive(Clone)]
pub struct UserRepository {
    users: Collection<User>,
    roles: Collection<Role>,
}

impl UserRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            users: db.collection("users"),
            roles: db.collection("roles"),
        }
    }

    /// Unique indexes backing the duplicate email/username checks.
    pub async fn init_indexes(&self) -> Result<()> {
        let email_index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(
                IndexOptions::builder()
                    .name("unique_email_idx".to_string())
                    .unique(true)
                    .build(),
            )
            .build();

        let username_index = IndexModel::builder()
            .keys(doc! { "username": 1 })
            .options(
                IndexOptions::builder()
                    .name("unique_username_idx".to_string())
                    .unique(true)
                    .build(),
            )
            .build();

        self.users
            .create_indexes([email_index, username_index], None)
            .await?;

        Ok(())
    }

    pub async fn insert(&self, user: &User) -> Result<()> {
        self.users.insert_one(user, None).await?;
        Ok(())
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<User>> {
        let user = self.users.find_one(doc! { "_id": id }, None).await?;
        Ok(user)
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let user = self
            .users
            .find_one(doc! { "username": username }, None)
            .await?;
        Ok(user)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = self.users.find_one(doc! { "email": email }, None).await?;
        Ok(user)
    }

    /// Atomically add `amount` to the balance; returns the new balance or
    /// `None` when the user does not exist.
    pub async fn deposit(&self, id: &str, amount: f64) -> Result<Option<f64>> {
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        let updated = self
            .users
            .find_one_and_update(
                doc! { "_id": id },
                doc! { "$inc": { "balance": amount } },
                options,
            )
            .await?;

        Ok(updated.map(|u| u.balance))
    }

    /// Compare-and-swap debit: only succeeds while the balance covers the
    /// amount, so a concurrent debit cannot overdraw. Returns the new
    /// balance, or `None` when the guard did not match.
    pub async fn try_debit(&self, id: &str, amount: f64) -> Result<Option<f64>> {
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        let updated = self
            .users
            .find_one_and_update(
                doc! { "_id": id, "balance": { "$gte": amount } },
                doc! { "$inc": { "balance": -amount } },
                options,
            )
            .await?;

        Ok(updated.map(|u| u.balance))
    }

    /// Atomically add `amount` back to the balance (rejection credit,
    /// debit compensation). Returns whether the user matched.
    pub async fn credit(&self, id: &str, amount: f64) -> Result<bool> {
        let result = self
            .users
            .update_one(
                doc! { "_id": id },
                doc! { "$inc": { "balance": amount } },
                None,
            )
            .await?;

        Ok(result.matched_count > 0)
    }

    pub async fn find_role(&self, id: &str) -> Result<Option<Role>> {
        let role = self.roles.find_one(doc! { "_id": id }, None).await?;
        Ok(role)
    }

    pub async fn find_role_by_name(&self, name: &str) -> Result<Option<Role>> {
        let role = self.roles.find_one(doc! { "name": name }, None).await?;
        Ok(role)
    }

    pub async fn insert_role(&self, role: &Role) -> Result<()> {
        self.roles.insert_one(role, None).await?;
        Ok(())
    }
}

/// Payment persistence. Status transitions are guarded server-side so a
/// rejection can never credit the owner twice.
#[derive(Clone)]
pub struct PaymentRepository {
    payments: Collection<Payment>,
}

impl PaymentRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            payments: db.collection("payments"),
        }
    }

    pub async fn init_indexes(&self) -> Result<()> {
        let user_index = IndexModel::builder()
            .keys(doc! { "userId": 1 })
            .options(
                IndexOptions::builder()
                    .name("payment_user_idx".to_string())
                    .build(),
            )
            .build();

        let status_index = IndexModel::builder()
            .keys(doc! { "status": 1 })
            .options(
                IndexOptions::builder()
                    .name("payment_status_idx".to_string())
                    .build(),
            )
            .build();

        self.payments
            .create_indexes([user_index, status_index], None)
            .await?;

        Ok(())
    }

    pub async fn insert(&self, payment: &Payment) -> Result<()> {
        self.payments.insert_one(payment, None).await?;
        Ok(())
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Payment>> {
        let payment = self.payments.find_one(doc! { "_id": id }, None).await?;
        Ok(payment)
    }

    pub async fn find_by_user(&self, user_id: &str) -> Result<Vec<Payment>> {
        let cursor = self
            .payments
            .find(doc! { "userId": user_id }, None)
            .await?;
        let payments = cursor.try_collect().await?;
        Ok(payments)
    }

    pub async fn list_all(&self) -> Result<Vec<Payment>> {
        let cursor = self.payments.find(doc! {}, None).await?;
        let payments = cursor.try_collect().await?;
        Ok(payments)
    }

    pub async fn set_verified(&self, id: &str) -> Result<bool> {
        let result = self
            .payments
            .update_one(
                doc! { "_id": id },
                doc! { "$set": { "isVerified": true } },
                None,
            )
            .await?;

        Ok(result.matched_count > 0)
    }

    pub async fn set_status(&self, id: &str, status: PaymentStatus) -> Result<bool> {
        let result = self
            .payments
            .update_one(
                doc! { "_id": id },
                doc! { "$set": { "status": status.as_str() } },
                None,
            )
            .await?;

        Ok(result.matched_count > 0)
    }

    /// Guarded transition to `Rejected`; returns the pre-image so the
    /// caller can credit the owner exactly once. `None` means the id did
    /// not match or the payment was already rejected.
    pub async fn try_reject(&self, id: &str) -> Result<Option<Payment>> {
        let rejected = self
            .payments
            .find_one_and_update(
                doc! { "_id": id, "status": { "$ne": PaymentStatus::Rejected.as_str() } },
                doc! { "$set": { "status": PaymentStatus::Rejected.as_str() } },
                None,
            )
            .await?;

        Ok(rejected)
    }
}
