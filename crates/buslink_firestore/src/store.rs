// --- File: crates/buslink_firestore/src/store.rs ---
//! Store implementations over the Firestore client: the refund ledger, the
//! trip catalog, and the operator-script maintenance operations.

use crate::client::{
    delete_write, update_write, Document, FirestoreClient, FirestoreError, Precondition,
    MAX_WRITES_PER_BATCH,
};
use crate::mapping::{
    self, refund_from_doc, route_fields, route_from_doc, schedule_fields, schedule_from_doc,
    ticket_from_doc, trip_fields, TRIP_MERGE_MASK,
};
use crate::value::{self, str_value, timestamp_value};
use buslink_common::models::{status, RefundRequest, Route, Schedule, Ticket, Trip};
use buslink_common::services::{
    BoxFuture, CatalogStore, CommitOutcome, DocVersion, RefundApproval, RefundStore, Versioned,
};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub mod collections {
    pub const ROUTES: &str = "routes";
    pub const SCHEDULES: &str = "schedules";
    pub const TRIPS: &str = "trips";
    pub const REFUNDS: &str = "refunds";
    pub const TICKETS: &str = "tickets";
}

/// Page size used by the collection wipe; well under the per-batch write cap.
const WIPE_PAGE_SIZE: usize = 300;

/// Document-store facade for the rest of the system.
#[derive(Clone)]
pub struct FirestoreStore {
    client: Arc<FirestoreClient>,
}

impl FirestoreStore {
    pub fn new(client: Arc<FirestoreClient>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &FirestoreClient {
        &self.client
    }

    fn versioned<T>(doc: &Document, entity: T) -> Versioned<T> {
        Versioned {
            doc: entity,
            version: DocVersion(doc.update_time.clone().unwrap_or_default()),
        }
    }

    async fn load_refund_inner(
        &self,
        refund_id: &str,
    ) -> Result<Option<Versioned<RefundRequest>>, FirestoreError> {
        let doc = self
            .client
            .get_document(collections::REFUNDS, refund_id)
            .await?;
        Ok(doc.map(|d| Self::versioned(&d, refund_from_doc(&d))))
    }

    async fn load_ticket_inner(
        &self,
        ticket_id: &str,
    ) -> Result<Option<Versioned<Ticket>>, FirestoreError> {
        let doc = self
            .client
            .get_document(collections::TICKETS, ticket_id)
            .await?;
        Ok(doc.map(|d| Self::versioned(&d, ticket_from_doc(&d))))
    }

    /// Marks the refund approved and the ticket refunded in one atomic
    /// commit, guarded by the versions both documents were read at.
    async fn commit_approval_inner(
        &self,
        approval: RefundApproval,
    ) -> Result<CommitOutcome, FirestoreError> {
        let now = timestamp_value(&Utc::now().naive_utc());

        let mut refund_fields = value::Fields::new();
        refund_fields.insert("status".to_string(), str_value(status::APPROVED));
        refund_fields.insert("processingStatus".to_string(), str_value(status::COMPLETED));
        refund_fields.insert(
            "stripeRefundId".to_string(),
            str_value(&approval.gateway_refund_id),
        );
        refund_fields.insert("approvedBy".to_string(), str_value(&approval.approved_by));
        refund_fields.insert("updatedAt".to_string(), now.clone());

        let mut ticket_fields = value::Fields::new();
        ticket_fields.insert("status".to_string(), str_value(status::REFUNDED));
        ticket_fields.insert("updatedAt".to_string(), now);

        let writes = vec![
            update_write(
                &self.client.doc_name(collections::REFUNDS, &approval.refund_id),
                &refund_fields,
                Some(&[
                    "status",
                    "processingStatus",
                    "stripeRefundId",
                    "approvedBy",
                    "updatedAt",
                ]),
                Some(Precondition::UpdateTime(approval.refund_version.0.clone())),
            ),
            update_write(
                &self.client.doc_name(collections::TICKETS, &approval.ticket_id),
                &ticket_fields,
                Some(&["status", "updatedAt"]),
                Some(Precondition::UpdateTime(approval.ticket_version.0.clone())),
            ),
        ];

        match self.client.commit(writes).await {
            Ok(()) => {
                info!(
                    refund_id = %approval.refund_id,
                    ticket_id = %approval.ticket_id,
                    "refund approval committed"
                );
                Ok(CommitOutcome::Committed)
            }
            Err(FirestoreError::Contention) => {
                debug!(refund_id = %approval.refund_id, "refund approval hit contention");
                Ok(CommitOutcome::Contention)
            }
            Err(other) => Err(other),
        }
    }

    async fn merge_trips_inner(&self, trips: Vec<Trip>) -> Result<(), FirestoreError> {
        if trips.is_empty() {
            return Ok(());
        }
        // Two writes per trip: a create-if-absent full document that seeds the
        // booking fields, then an unconditional masked update of the
        // schedule-derived fields. On an existing trip the first write fails
        // its precondition (tolerated by batchWrite) and the second leaves the
        // booking fields alone.
        //
        // batchWrite allows at most one write per document per request and
        // does not order writes, so the creates and the updates go out as two
        // sequential requests.
        let mut creates = Vec::with_capacity(trips.len());
        let mut updates = Vec::with_capacity(trips.len());
        for trip in &trips {
            let name = self.client.doc_name(collections::TRIPS, &trip.id);
            let fields = trip_fields(trip);
            creates.push(update_write(
                &name,
                &fields,
                None,
                Some(Precondition::Exists(false)),
            ));
            updates.push(update_write(&name, &fields, Some(TRIP_MERGE_MASK), None));
        }
        debug_assert!(creates.len() <= MAX_WRITES_PER_BATCH);
        self.client.batch_write(creates).await?;
        self.client.batch_write(updates).await
    }
}

impl RefundStore for FirestoreStore {
    type Error = FirestoreError;

    fn load_refund(
        &self,
        refund_id: &str,
    ) -> BoxFuture<'_, Option<Versioned<RefundRequest>>, Self::Error> {
        let refund_id = refund_id.to_string();
        Box::pin(async move { self.load_refund_inner(&refund_id).await })
    }

    fn load_ticket(
        &self,
        ticket_id: &str,
    ) -> BoxFuture<'_, Option<Versioned<Ticket>>, Self::Error> {
        let ticket_id = ticket_id.to_string();
        Box::pin(async move { self.load_ticket_inner(&ticket_id).await })
    }

    fn commit_approval(
        &self,
        approval: RefundApproval,
    ) -> BoxFuture<'_, CommitOutcome, Self::Error> {
        Box::pin(async move { self.commit_approval_inner(approval).await })
    }
}

impl CatalogStore for FirestoreStore {
    type Error = FirestoreError;

    fn list_routes(&self) -> BoxFuture<'_, Vec<Route>, Self::Error> {
        Box::pin(async move {
            let docs = self.client.list_documents(collections::ROUTES).await?;
            Ok(docs.iter().map(route_from_doc).collect())
        })
    }

    fn list_schedules(&self) -> BoxFuture<'_, Vec<Schedule>, Self::Error> {
        Box::pin(async move {
            let docs = self.client.list_documents(collections::SCHEDULES).await?;
            let mut schedules = Vec::with_capacity(docs.len());
            for doc in &docs {
                match schedule_from_doc(doc) {
                    Some(schedule) => schedules.push(schedule),
                    None => warn!(doc_id = %doc.doc_id(), "skipping malformed schedule document"),
                }
            }
            Ok(schedules)
        })
    }

    fn merge_trips(&self, trips: Vec<Trip>) -> BoxFuture<'_, (), Self::Error> {
        Box::pin(async move { self.merge_trips_inner(trips).await })
    }
}

// --- Operator-script operations ---

/// Legacy schedule-shaped fields that the migration strips off route
/// documents once they have been split out into `schedules`.
pub const LEGACY_ROUTE_FIELDS: &[&str] = &[
    "price",
    "busNumber",
    "operatorName",
    "busType",
    "features",
    "recurrenceDays",
    "departureHour",
    "departureMinute",
    "arrivalHour",
    "arrivalMinute",
    "platformNumber",
    "bookedSeats",
    "delayMinutes",
    "status",
    "arrivalTime",
    "departureTime",
    "isGenerated",
    "fromCity",
    "toCity",
];

impl FirestoreStore {
    /// Raw route documents, for the migration and patch scripts that need to
    /// inspect legacy fields the domain model no longer carries.
    pub async fn list_route_documents(&self) -> Result<Vec<Document>, FirestoreError> {
        self.client.list_documents(collections::ROUTES).await
    }

    /// Applies one route's migration atomically: creates the schedule and
    /// rewrites the route (deleting every legacy field) in a single commit,
    /// so a failure can never leave a legacy route with a minted schedule.
    pub async fn migrate_route(
        &self,
        route: &Route,
        schedule: &Schedule,
    ) -> Result<(), FirestoreError> {
        let fields = route_fields(route);
        let mut mask: Vec<&str> = fields.keys().map(String::as_str).collect();
        mask.extend_from_slice(LEGACY_ROUTE_FIELDS);
        let writes = vec![
            update_write(
                &self.client.doc_name(collections::SCHEDULES, &schedule.id),
                &schedule_fields(schedule),
                None,
                None,
            ),
            update_write(
                &self.client.doc_name(collections::ROUTES, &route.id),
                &fields,
                Some(&mask),
                None,
            ),
        ];
        self.client.commit(writes).await
    }

    /// Fills in the derived distance/duration metrics only, leaving the rest
    /// of the route document untouched. A `None` leaves that field alone.
    pub async fn patch_route_metrics(
        &self,
        route_id: &str,
        distance_km: Option<f64>,
        estimated_duration_mins: Option<i64>,
    ) -> Result<(), FirestoreError> {
        let mut fields = value::Fields::new();
        let mut mask: Vec<&str> = Vec::new();
        if let Some(distance_km) = distance_km {
            fields.insert("distanceKm".to_string(), value::double_value(distance_km));
            mask.push("distanceKm");
        }
        if let Some(mins) = estimated_duration_mins {
            fields.insert("estimatedDurationMins".to_string(), value::int_value(mins));
            mask.push("estimatedDurationMins");
        }
        if mask.is_empty() {
            return Ok(());
        }
        let write = update_write(
            &self.client.doc_name(collections::ROUTES, route_id),
            &fields,
            Some(&mask),
            None,
        );
        self.client.commit(vec![write]).await
    }

    /// Writes a batch of routes and schedules in as few requests as the
    /// per-batch cap allows.
    pub async fn put_catalog(
        &self,
        routes: &[Route],
        schedules: &[Schedule],
    ) -> Result<(), FirestoreError> {
        let mut writes = Vec::with_capacity(routes.len() + schedules.len());
        for route in routes {
            writes.push(update_write(
                &self.client.doc_name(collections::ROUTES, &route.id),
                &route_fields(route),
                None,
                None,
            ));
        }
        for schedule in schedules {
            writes.push(update_write(
                &self.client.doc_name(collections::SCHEDULES, &schedule.id),
                &schedule_fields(schedule),
                None,
                None,
            ));
        }
        for chunk in writes.chunks(MAX_WRITES_PER_BATCH) {
            self.client.batch_write(chunk.to_vec()).await?;
        }
        Ok(())
    }

    /// Deletes every document in a collection, one page at a time, until a
    /// page comes back empty. Bounded iteration, never recursion.
    pub async fn wipe_collection(&self, collection: &str) -> Result<usize, FirestoreError> {
        let mut deleted = 0usize;
        loop {
            let page = self
                .client
                .list_document_page(collection, WIPE_PAGE_SIZE)
                .await?;
            if page.is_empty() {
                break;
            }
            let writes: Vec<_> = page.iter().map(|doc| delete_write(&doc.name)).collect();
            deleted += writes.len();
            self.client.batch_write(writes).await?;
        }
        info!(collection, deleted, "collection wiped");
        Ok(deleted)
    }

    /// True when the raw document still carries any of the legacy fields.
    pub fn has_legacy_fields(doc: &Document) -> bool {
        LEGACY_ROUTE_FIELDS
            .iter()
            .any(|key| mapping::field_present(&doc.fields, key))
    }
}
