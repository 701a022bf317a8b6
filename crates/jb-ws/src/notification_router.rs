use crate::{
    ConnectionEntry, ConnectionRegistry, DeliveryResult, Envelope, Metrics,
    Result as WsErrorResult, RouterConfig, create_delivery_span, envelope::DIRECT_EVENT,
};

use std::time::{Duration, Instant};

use axum::extract::ws::Message;
use futures::StreamExt;
use jb_core::{Notification, NotificationKind, Role};
use log::{debug, warn};
use serde_json::Value;
use tokio::time::timeout;
use tracing::Instrument;

/// Routes notifications to the connection(s) implied by an addressing
/// target: a single user, a role group, or everyone.
///
/// Delivery is fire-and-forget. A push that fails or times out is reported
/// as `NoActiveConnection` and the stale entry is evicted, so the registry
/// heals without outside intervention. Durable fallback (e.g. email) is the
/// caller's decision, taken on the returned result.
pub struct NotificationRouter {
    registry: ConnectionRegistry,
    config: RouterConfig,
    metrics: Metrics,
}

impl NotificationRouter {
    pub fn new(registry: ConnectionRegistry, config: RouterConfig, metrics: Metrics) -> Self {
        Self {
            registry,
            config,
            metrics,
        }
    }

    /// Deliver `notification` to `user_id`'s live connection, if any.
    ///
    /// Returns `Delivered` only when the payload was handed to the
    /// transport within the configured send timeout. An absent, closed, or
    /// wedged connection yields `NoActiveConnection`; the latter two also
    /// evict the stale entry.
    pub async fn deliver_to(
        &self,
        user_id: &str,
        notification: &Notification,
    ) -> WsErrorResult<DeliveryResult> {
        notification.validate()?;
        let frame = Envelope::direct(notification).encode()?;
        let kind = notification.kind.as_str();

        // Look up under the guard, push outside it
        let Some(entry) = self.registry.get(user_id).await else {
            debug!("No active connection for user {user_id}, dropping {kind} notification");
            self.metrics.notification_dropped(kind, "offline");
            return Ok(DeliveryResult::NoActiveConnection);
        };

        let started = Instant::now();
        let pushed = self
            .push(&entry, frame)
            .instrument(create_delivery_span(DIRECT_EVENT, user_id, kind))
            .await;
        self.metrics.delivery_latency(started.elapsed());

        match pushed {
            Ok(()) => {
                self.metrics.notification_delivered(kind);
                Ok(DeliveryResult::Delivered)
            }
            Err(reason) => {
                warn!(
                    "Push to user {user_id} failed ({reason}), evicting connection {}",
                    entry.connection_id
                );
                self.evict_stale(&entry).await;
                self.metrics.notification_dropped(kind, reason);
                Ok(DeliveryResult::NoActiveConnection)
            }
        }
    }

    /// Fan out to every member of `role` connected at call time.
    /// Returns the number of recipients attempted.
    pub async fn broadcast_to_role(
        &self,
        role: Role,
        event: &str,
        notification: &Notification,
    ) -> WsErrorResult<usize> {
        notification.validate()?;
        let recipients = self.registry.list_by_role(role).await;
        debug!(
            "Broadcasting {event} to {} {role} connection(s)",
            recipients.len()
        );
        self.fan_out(recipients, event, notification).await
    }

    /// Fan out to every connected user. Returns the number attempted.
    pub async fn broadcast_to_all(
        &self,
        event: &str,
        notification: &Notification,
    ) -> WsErrorResult<usize> {
        notification.validate()?;
        let recipients = self.registry.list_all().await;
        debug!("Broadcasting {event} to all {} connection(s)", recipients.len());
        self.fan_out(recipients, event, notification).await
    }

    /// Tell an employer a seeker applied to one of their postings
    pub async fn notify_new_application(
        &self,
        employer_id: &str,
        applicant_name: &str,
        job_title: &str,
        data: Value,
    ) -> WsErrorResult<DeliveryResult> {
        let notification = Notification::new(
            NotificationKind::JobApplication,
            "New Job Application",
            format!("{applicant_name} applied for {job_title}"),
            data,
        );
        self.deliver_to(employer_id, &notification).await
    }

    /// Tell an applicant their application changed status
    pub async fn notify_status_update(
        &self,
        applicant_id: &str,
        job_title: &str,
        status: &str,
        data: Value,
    ) -> WsErrorResult<DeliveryResult> {
        let notification = Notification::new(
            NotificationKind::ApplicationUpdate,
            "Application Status Updated",
            format!("Your application for {job_title} has been {status}"),
            data,
        );
        self.deliver_to(applicant_id, &notification).await
    }

    /// Tell an applicant an interview was scheduled
    pub async fn notify_interview_scheduled(
        &self,
        applicant_id: &str,
        job_title: &str,
        date: &str,
        data: Value,
    ) -> WsErrorResult<DeliveryResult> {
        let notification = Notification::new(
            NotificationKind::Interview,
            "Interview Scheduled",
            format!("Interview scheduled for {job_title} on {date}"),
            data,
        );
        self.deliver_to(applicant_id, &notification).await
    }

    /// Announce a new posting to every connected seeker
    pub async fn notify_job_seekers(
        &self,
        job_title: &str,
        data: Value,
    ) -> WsErrorResult<usize> {
        let notification = Notification::new(
            NotificationKind::NewJobMatch,
            "New Job Posted",
            format!("New job posted: {job_title}"),
            data,
        );
        self.broadcast_to_role(Role::Seeker, "new_job_match", &notification)
            .await
    }

    /// Concurrency-bounded fan-out over a registry snapshot.
    /// The frame is serialized once and cloned per recipient.
    async fn fan_out(
        &self,
        recipients: Vec<ConnectionEntry>,
        event: &str,
        notification: &Notification,
    ) -> WsErrorResult<usize> {
        let attempted = recipients.len();
        if attempted == 0 {
            return Ok(0);
        }

        let text = Envelope::new(event, notification).encode_text()?;
        let kind = notification.kind.as_str();

        futures::stream::iter(recipients)
            .for_each_concurrent(self.config.max_concurrent_pushes, |entry| {
                let frame = Message::Text(text.clone().into());
                async move {
                    match self.push(&entry, frame).await {
                        Ok(()) => self.metrics.notification_delivered(kind),
                        Err(reason) => {
                            warn!(
                                "Broadcast push to user {} failed ({reason}), evicting connection {}",
                                entry.user_id, entry.connection_id
                            );
                            self.evict_stale(&entry).await;
                            self.metrics.notification_dropped(kind, reason);
                        }
                    }
                }
            })
            .await;

        self.metrics.broadcast_published(event, attempted);
        Ok(attempted)
    }

    /// Hand a frame to one connection's outbound queue.
    /// Never holds the registry guard; the send may suspend on backpressure.
    async fn push(&self, entry: &ConnectionEntry, frame: Message) -> Result<(), &'static str> {
        let send_timeout = Duration::from_secs(self.config.send_timeout_secs);

        match timeout(send_timeout, entry.sender.send(frame)).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(_)) => Err("closed"),
            Err(_) => Err("timeout"),
        }
    }

    /// Remove an entry whose transport proved dead, unless a reconnect
    /// already replaced it.
    async fn evict_stale(&self, entry: &ConnectionEntry) {
        if self
            .registry
            .unregister_connection(&entry.user_id, entry.connection_id)
            .await
        {
            self.metrics.error_occurred("stale_connection");
        }
    }
}

impl Clone for NotificationRouter {
    fn clone(&self) -> Self {
        Self {
            registry: self.registry.clone(),
            config: self.config.clone(),
            metrics: self.metrics.clone(),
        }
    }
}
