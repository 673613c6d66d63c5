//! Service container: one place that wires repositories into services
//! and hands them to the API layer behind a trait.

use std::future::Future;
use std::sync::Arc;

use sea_orm::DatabaseConnection;

use super::{
    AgentRequestManager, AgentService, ApplicationManager, ApplicationService, AuthService,
    Authenticator, CustomerOrderManager, CustomerOrderService, FeedbackManager, FeedbackService,
    GeographyManager, GeographyService, JobManager, JobService, MessageDesk, MessageService,
    NewsRoom, NewsService, PartnershipManager, PartnershipService, ReportManager, ReportService,
    ServiceOrderManager, ServiceOrderService, StatsRoom, StatsService, UserManager, UserService,
};
use crate::config::Config;
use crate::errors::AppResult;
use crate::infra::repositories::{
    AgentRequestStore, CustomerOrderStore, FeedbackStore, GeographyStore, JobApplicationStore,
    JobStore, MessageStore, NewsStore, PartnershipStore, RefreshTokenStore, ReportStore,
    ServiceOrderStore, StatsStore, UserStore,
};
use crate::infra::{Cache, LocalAssetStore};
use crate::jobs::EmailNotifier;

/// Centralized access to the application services.
pub trait ServiceContainer: Send + Sync {
    fn auth(&self) -> Arc<dyn AuthService>;
    fn users(&self) -> Arc<dyn UserService>;
    fn geography(&self) -> Arc<dyn GeographyService>;
    fn reports(&self) -> Arc<dyn ReportService>;
    fn service_orders(&self) -> Arc<dyn ServiceOrderService>;
    fn customer_orders(&self) -> Arc<dyn CustomerOrderService>;
    fn jobs(&self) -> Arc<dyn JobService>;
    fn applications(&self) -> Arc<dyn ApplicationService>;
    fn partnerships(&self) -> Arc<dyn PartnershipService>;
    fn agents(&self) -> Arc<dyn AgentService>;
    fn feedback(&self) -> Arc<dyn FeedbackService>;
    fn messages(&self) -> Arc<dyn MessageService>;
    fn news(&self) -> Arc<dyn NewsService>;
    fn stats(&self) -> Arc<dyn StatsService>;
}

/// Concrete [`ServiceContainer`].
pub struct Services {
    auth: Arc<dyn AuthService>,
    users: Arc<dyn UserService>,
    geography: Arc<dyn GeographyService>,
    reports: Arc<dyn ReportService>,
    service_orders: Arc<dyn ServiceOrderService>,
    customer_orders: Arc<dyn CustomerOrderService>,
    jobs: Arc<dyn JobService>,
    applications: Arc<dyn ApplicationService>,
    partnerships: Arc<dyn PartnershipService>,
    agents: Arc<dyn AgentService>,
    feedback: Arc<dyn FeedbackService>,
    messages: Arc<dyn MessageService>,
    news: Arc<dyn NewsService>,
    stats: Arc<dyn StatsService>,
}

impl Services {
    /// Wire every store and service from live connections.
    pub fn from_connection(db: DatabaseConnection, cache: Cache, config: Config) -> Self {
        let users = Arc::new(UserStore::new(db.clone()));
        let tokens = Arc::new(RefreshTokenStore::new(db.clone()));
        let geography_store = Arc::new(GeographyStore::new(db.clone()));
        let reports = Arc::new(ReportStore::new(db.clone()));
        let service_orders = Arc::new(ServiceOrderStore::new(db.clone()));
        let customer_orders = Arc::new(CustomerOrderStore::new(db.clone()));
        let jobs = Arc::new(JobStore::new(db.clone()));
        let applications = Arc::new(JobApplicationStore::new(db.clone()));
        let partnerships = Arc::new(PartnershipStore::new(db.clone()));
        let agents = Arc::new(AgentRequestStore::new(db.clone()));
        let feedback = Arc::new(FeedbackStore::new(db.clone()));
        let messages = Arc::new(MessageStore::new(db.clone()));
        let news = Arc::new(NewsStore::new(db.clone()));
        let stats = Arc::new(StatsStore::new(db));

        let transient = Arc::new(cache);
        let assets = Arc::new(LocalAssetStore::new(config.upload_dir.clone()));
        let notifier = Arc::new(EmailNotifier);

        Self {
            auth: Arc::new(Authenticator::new(
                users.clone(),
                tokens.clone(),
                transient,
                notifier.clone(),
                config,
            )),
            users: Arc::new(UserManager::new(
                users.clone(),
                tokens,
                geography_store.clone(),
            )),
            geography: Arc::new(GeographyManager::new(geography_store.clone())),
            reports: Arc::new(ReportManager::new(
                reports,
                users.clone(),
                geography_store.clone(),
                assets.clone(),
                notifier.clone(),
            )),
            service_orders: Arc::new(ServiceOrderManager::new(
                service_orders,
                users.clone(),
                geography_store.clone(),
                assets.clone(),
                notifier.clone(),
            )),
            customer_orders: Arc::new(CustomerOrderManager::new(
                customer_orders,
                users.clone(),
                geography_store.clone(),
                assets.clone(),
                notifier.clone(),
            )),
            jobs: Arc::new(JobManager::new(jobs.clone())),
            applications: Arc::new(ApplicationManager::new(
                applications,
                jobs,
                users.clone(),
                assets.clone(),
                notifier.clone(),
            )),
            partnerships: Arc::new(PartnershipManager::new(
                partnerships,
                users.clone(),
                notifier.clone(),
            )),
            agents: Arc::new(AgentRequestManager::new(
                agents,
                users.clone(),
                geography_store,
                notifier,
            )),
            feedback: Arc::new(FeedbackManager::new(feedback)),
            messages: Arc::new(MessageDesk::new(messages, users)),
            news: Arc::new(NewsRoom::new(news, assets)),
            stats: Arc::new(StatsRoom::new(stats)),
        }
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth.clone()
    }

    fn users(&self) -> Arc<dyn UserService> {
        self.users.clone()
    }

    fn geography(&self) -> Arc<dyn GeographyService> {
        self.geography.clone()
    }

    fn reports(&self) -> Arc<dyn ReportService> {
        self.reports.clone()
    }

    fn service_orders(&self) -> Arc<dyn ServiceOrderService> {
        self.service_orders.clone()
    }

    fn customer_orders(&self) -> Arc<dyn CustomerOrderService> {
        self.customer_orders.clone()
    }

    fn jobs(&self) -> Arc<dyn JobService> {
        self.jobs.clone()
    }

    fn applications(&self) -> Arc<dyn ApplicationService> {
        self.applications.clone()
    }

    fn partnerships(&self) -> Arc<dyn PartnershipService> {
        self.partnerships.clone()
    }

    fn agents(&self) -> Arc<dyn AgentService> {
        self.agents.clone()
    }

    fn feedback(&self) -> Arc<dyn FeedbackService> {
        self.feedback.clone()
    }

    fn messages(&self) -> Arc<dyn MessageService> {
        self.messages.clone()
    }

    fn news(&self) -> Arc<dyn NewsService> {
        self.news.clone()
    }

    fn stats(&self) -> Arc<dyn StatsService> {
        self.stats.clone()
    }
}

/// Run independent fallible operations concurrently.
pub mod parallel {
    use super::*;
    use tokio::try_join;

    /// Two operations; fails fast on the first error.
    pub async fn join2<F1, F2, T1, T2>(f1: F1, f2: F2) -> AppResult<(T1, T2)>
    where
        F1: Future<Output = AppResult<T1>>,
        F2: Future<Output = AppResult<T2>>,
    {
        try_join!(f1, f2)
    }

    pub async fn join3<F1, F2, F3, T1, T2, T3>(f1: F1, f2: F2, f3: F3) -> AppResult<(T1, T2, T3)>
    where
        F1: Future<Output = AppResult<T1>>,
        F2: Future<Output = AppResult<T2>>,
        F3: Future<Output = AppResult<T3>>,
    {
        try_join!(f1, f2, f3)
    }

    /// Homogeneous fan-out; results keep input order.
    pub async fn join_all<F, T>(futures: Vec<F>) -> AppResult<Vec<T>>
    where
        F: Future<Output = AppResult<T>>,
    {
        let results = futures::future::join_all(futures).await;
        results.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn join2_returns_both_results() {
        async fn op1() -> AppResult<i32> {
            Ok(1)
        }
        async fn op2() -> AppResult<i32> {
            Ok(2)
        }

        let (a, b) = parallel::join2(op1(), op2()).await.unwrap();
        assert_eq!(a, 1);
        assert_eq!(b, 2);
    }

    #[tokio::test]
    async fn join_all_keeps_order() {
        async fn op(i: i32) -> AppResult<i32> {
            Ok(i)
        }

        let results = parallel::join_all((0..5).map(op).collect()).await.unwrap();
        assert_eq!(results, vec![0, 1, 2, 3, 4]);
    }
}
