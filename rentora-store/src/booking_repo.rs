use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rentora_core::models::{
    Booking, BookingItem, BookingStatus, CustomerInfo, CustomerSnapshot, DeliveryType,
};
use rentora_core::repository::{
    BookingListing, BookingRecord, BookingRepository, StoreError, StoreResult,
};
use rentora_shared::pii::Masked;
use sqlx::PgPool;
use uuid::Uuid;

pub struct PgBookingRepository {
    pool: PgPool,
}

impl PgBookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const BOOKING_COLUMNS: &str = "b.id, b.hoster_id, b.user_id, b.start_date, b.end_date, b.total_days, \
     b.delivery_type, b.rental_subtotal, b.deposit_subtotal, b.discount, b.total_amount, \
     b.outstanding_amount, b.identity_id, b.status, b.locked_until, b.created_at, b.updated_at";

// Internal structs for type-safe querying
#[derive(sqlx::FromRow)]
struct BookingRow {
    id: Uuid,
    hoster_id: Uuid,
    user_id: Uuid,
    start_date: DateTime<Utc>,
    end_date: DateTime<Utc>,
    total_days: i64,
    delivery_type: String,
    rental_subtotal: i64,
    deposit_subtotal: i64,
    discount: i64,
    total_amount: i64,
    outstanding_amount: i64,
    identity_id: Option<Uuid>,
    status: String,
    locked_until: DateTime<Utc>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<BookingRow> for Booking {
    type Error = StoreError;

    fn try_from(row: BookingRow) -> Result<Self, Self::Error> {
        Ok(Booking {
            id: row.id,
            hoster_id: row.hoster_id,
            user_id: row.user_id,
            start_date: row.start_date,
            end_date: row.end_date,
            total_days: row.total_days,
            delivery_type: row.delivery_type.parse::<DeliveryType>().map_err(StoreError::backend)?,
            rental_subtotal: row.rental_subtotal,
            deposit_subtotal: row.deposit_subtotal,
            discount: row.discount,
            total_amount: row.total_amount,
            outstanding_amount: row.outstanding_amount,
            identity_id: row.identity_id,
            status: row.status.parse::<BookingStatus>().map_err(StoreError::backend)?,
            locked_until: row.locked_until,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct ListingRow {
    #[sqlx(flatten)]
    booking: BookingRow,
    item_count: i64,
}

#[derive(sqlx::FromRow)]
struct BookingItemRow {
    id: Uuid,
    booking_id: Uuid,
    item_id: Uuid,
    name: String,
    price_per_day: i64,
    deposit: i64,
    quantity: i32,
    subtotal_rental: i64,
    subtotal_deposit: i64,
    created_at: DateTime<Utc>,
}

impl From<BookingItemRow> for BookingItem {
    fn from(row: BookingItemRow) -> Self {
        BookingItem {
            id: row.id,
            booking_id: row.booking_id,
            item_id: row.item_id,
            name: row.name,
            price_per_day: row.price_per_day,
            deposit: row.deposit,
            quantity: row.quantity,
            subtotal_rental: row.subtotal_rental,
            subtotal_deposit: row.subtotal_deposit,
            created_at: row.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct CustomerRow {
    id: Uuid,
    booking_id: Uuid,
    name: String,
    phone: String,
    email: String,
    delivery_address: Option<String>,
    notes: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<CustomerRow> for CustomerSnapshot {
    fn from(row: CustomerRow) -> Self {
        CustomerSnapshot {
            id: row.id,
            booking_id: row.booking_id,
            name: row.name,
            phone: Masked::new(row.phone),
            email: Masked::new(row.email),
            delivery_address: row.delivery_address,
            notes: row.notes,
            created_at: row.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct CustomerInfoRow {
    user_id: Uuid,
    name: String,
    phone: String,
    email: String,
    booking_count: i64,
    last_booking_at: DateTime<Utc>,
}

impl PgBookingRepository {
    /// Returns Ok(false) when the renter has no identity record; the
    /// transaction is dropped without commit in that case and on every error.
    async fn insert_record(&self, record: &BookingRecord) -> Result<bool, sqlx::Error> {
        let booking = &record.booking;
        let mut tx = self.pool.begin().await?;

        let has_identity: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM identities WHERE user_id = $1)")
                .bind(booking.user_id)
                .fetch_one(&mut *tx)
                .await?;

        if !has_identity {
            tx.rollback().await?;
            return Ok(false);
        }

        sqlx::query(
            r#"
            INSERT INTO bookings (id, hoster_id, user_id, start_date, end_date, total_days, delivery_type,
                                  rental_subtotal, deposit_subtotal, discount, total_amount, outstanding_amount,
                                  identity_id, status, locked_until, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            "#,
        )
        .bind(booking.id)
        .bind(booking.hoster_id)
        .bind(booking.user_id)
        .bind(booking.start_date)
        .bind(booking.end_date)
        .bind(booking.total_days)
        .bind(booking.delivery_type.as_str())
        .bind(booking.rental_subtotal)
        .bind(booking.deposit_subtotal)
        .bind(booking.discount)
        .bind(booking.total_amount)
        .bind(booking.outstanding_amount)
        .bind(booking.identity_id)
        .bind(booking.status.as_str())
        .bind(booking.locked_until)
        .bind(booking.created_at)
        .bind(booking.updated_at)
        .execute(&mut *tx)
        .await?;

        for item in &record.items {
            sqlx::query(
                r#"
                INSERT INTO booking_items (id, booking_id, item_id, name, price_per_day, deposit, quantity,
                                           subtotal_rental, subtotal_deposit, created_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                "#,
            )
            .bind(item.id)
            .bind(item.booking_id)
            .bind(item.item_id)
            .bind(&item.name)
            .bind(item.price_per_day)
            .bind(item.deposit)
            .bind(item.quantity)
            .bind(item.subtotal_rental)
            .bind(item.subtotal_deposit)
            .bind(item.created_at)
            .execute(&mut *tx)
            .await?;
        }

        let customer = &record.customer;
        sqlx::query(
            r#"
            INSERT INTO booking_customers (id, booking_id, name, phone, email, delivery_address, notes, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(customer.id)
        .bind(customer.booking_id)
        .bind(&customer.name)
        .bind(customer.phone.expose())
        .bind(customer.email.expose())
        .bind(&customer.delivery_address)
        .bind(&customer.notes)
        .bind(customer.created_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(true)
    }

    async fn listings(&self, filter_column: &str, id: Uuid) -> StoreResult<Vec<BookingListing>> {
        let sql = format!(
            "SELECT {}, (SELECT COUNT(*) FROM booking_items i WHERE i.booking_id = b.id) AS item_count \
             FROM bookings b WHERE b.{} = $1 ORDER BY b.created_at DESC",
            BOOKING_COLUMNS, filter_column
        );

        let rows: Vec<ListingRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_all(&self.pool)
            .await
            .map_err(StoreError::backend)?;

        rows.into_iter()
            .map(|row| {
                Ok(BookingListing {
                    item_count: row.item_count,
                    booking: Booking::try_from(row.booking)?,
                })
            })
            .collect()
    }
}

#[async_trait]
impl BookingRepository for PgBookingRepository {
    async fn create_booking(&self, record: &BookingRecord) -> StoreResult<()> {
        match self.insert_record(record).await {
            Ok(true) => Ok(()),
            Ok(false) => Err(StoreError::IdentityMissing),
            Err(e) => Err(StoreError::backend(e)),
        }
    }

    async fn get_booking(&self, id: Uuid) -> StoreResult<Option<Booking>> {
        let sql = format!("SELECT {} FROM bookings b WHERE b.id = $1", BOOKING_COLUMNS);
        let row: Option<BookingRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StoreError::backend)?;

        row.map(Booking::try_from).transpose()
    }

    async fn get_booking_record(&self, id: Uuid) -> StoreResult<Option<BookingRecord>> {
        let Some(booking) = self.get_booking(id).await? else {
            return Ok(None);
        };

        let items: Vec<BookingItemRow> = sqlx::query_as(
            "SELECT id, booking_id, item_id, name, price_per_day, deposit, quantity, subtotal_rental, \
             subtotal_deposit, created_at FROM booking_items WHERE booking_id = $1 ORDER BY created_at, id",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .map_err(StoreError::backend)?;

        let customer: CustomerRow = sqlx::query_as(
            "SELECT id, booking_id, name, phone, email, delivery_address, notes, created_at \
             FROM booking_customers WHERE booking_id = $1",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(StoreError::backend)?;

        Ok(Some(BookingRecord {
            booking,
            items: items.into_iter().map(BookingItem::from).collect(),
            customer: customer.into(),
        }))
    }

    async fn list_for_renter(&self, user_id: Uuid) -> StoreResult<Vec<BookingListing>> {
        self.listings("user_id", user_id).await
    }

    async fn list_for_hoster(&self, hoster_id: Uuid) -> StoreResult<Vec<BookingListing>> {
        self.listings("hoster_id", hoster_id).await
    }

    async fn list_customers_for_hoster(&self, hoster_id: Uuid) -> StoreResult<Vec<CustomerInfo>> {
        // One row per renter, contact details taken from their latest booking.
        let mut rows: Vec<CustomerInfoRow> = sqlx::query_as(
            r#"
            SELECT DISTINCT ON (b.user_id)
                   b.user_id, c.name, c.phone, c.email,
                   COUNT(*) OVER (PARTITION BY b.user_id) AS booking_count,
                   b.created_at AS last_booking_at
            FROM bookings b
            JOIN booking_customers c ON c.booking_id = b.id
            WHERE b.hoster_id = $1
            ORDER BY b.user_id, b.created_at DESC
            "#,
        )
        .bind(hoster_id)
        .fetch_all(&self.pool)
        .await
        .map_err(StoreError::backend)?;

        rows.sort_by(|a, b| b.last_booking_at.cmp(&a.last_booking_at));

        Ok(rows
            .into_iter()
            .map(|row| CustomerInfo {
                user_id: row.user_id,
                name: row.name,
                phone: Masked::new(row.phone),
                email: Masked::new(row.email),
                booking_count: row.booking_count,
                last_booking_at: row.last_booking_at,
            })
            .collect())
    }

    async fn update_status_if(
        &self,
        id: Uuid,
        from: BookingStatus,
        to: BookingStatus,
        at: DateTime<Utc>,
    ) -> StoreResult<bool> {
        let result = sqlx::query(
            "UPDATE bookings SET status = $1, updated_at = $2 WHERE id = $3 AND status = $4",
        )
        .bind(to.as_str())
        .bind(at)
        .bind(id)
        .bind(from.as_str())
        .execute(&self.pool)
        .await
        .map_err(StoreError::backend)?;

        Ok(result.rows_affected() == 1)
    }
}
