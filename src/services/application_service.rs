use std::sync::Arc;

use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::database::{ApplicationFilter, RecordStore, StoreInsert};
use crate::error::{Error, Result};
use crate::models::{
    application::{Application, ApplicationStatus},
    user::Role,
};
use crate::services::allocator::{ReserveOutcome, VacancyAllocator};
use crate::services::resume_service::ResumeService;
use crate::utils::time;

/// What `submit` does with a seat it reserved when the application row
/// cannot be written afterwards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubmitPolicy {
    /// `false` keeps the reserved seat (it leaks); `true` gives it back.
    pub release_seat_on_failure: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Created(Application),
    DuplicateApplication,
    ResumeNotFound,
    NoSeatAvailable,
    JobNotFound,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SetStatusOutcome {
    Updated(Application),
    NotFound,
    Forbidden,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WithdrawOutcome {
    Removed,
    NotFound,
    NotOwner,
}

#[derive(Clone)]
pub struct ApplicationService {
    store: Arc<dyn RecordStore>,
    allocator: VacancyAllocator,
    resumes: ResumeService,
    policy: SubmitPolicy,
}

impl ApplicationService {
    pub fn new(
        store: Arc<dyn RecordStore>,
        allocator: VacancyAllocator,
        resumes: ResumeService,
        policy: SubmitPolicy,
    ) -> Self {
        Self {
            store,
            allocator,
            resumes,
            policy,
        }
    }

    /// Applies `applicant_id` to `job_id`.
    ///
    /// The application row is only written after a seat was reserved. The
    /// duplicate lookup up front saves a seat in the common case; the
    /// store's uniqueness constraint is what actually rejects a racing
    /// duplicate.
    #[instrument(skip(self))]
    pub async fn submit(
        &self,
        applicant_id: Uuid,
        job_id: Uuid,
        resume_id: Uuid,
    ) -> Result<SubmitOutcome> {
        if self
            .store
            .find_application(applicant_id, job_id)
            .await?
            .is_some()
        {
            return Ok(SubmitOutcome::DuplicateApplication);
        }

        if self.resumes.resolve(resume_id, applicant_id).await?.is_none() {
            return Ok(SubmitOutcome::ResumeNotFound);
        }

        match self.allocator.reserve_seat(job_id).await? {
            ReserveOutcome::Reserved(_) => {}
            ReserveOutcome::NoSeatAvailable => return Ok(SubmitOutcome::NoSeatAvailable),
            ReserveOutcome::JobNotFound => return Ok(SubmitOutcome::JobNotFound),
        }

        let application = Application::new(applicant_id, job_id, resume_id, time::now());
        match self.store.insert_application(&application).await {
            Ok(StoreInsert::Inserted(created)) => {
                info!(application_id = %created.id, "Application submitted");
                Ok(SubmitOutcome::Created(created))
            }
            Ok(StoreInsert::Conflict) => {
                self.reservation_orphaned(job_id, "duplicate application")
                    .await;
                Ok(SubmitOutcome::DuplicateApplication)
            }
            Err(e) => {
                self.reservation_orphaned(job_id, "application insert failed")
                    .await;
                Err(e)
            }
        }
    }

    async fn reservation_orphaned(&self, job_id: Uuid, reason: &str) {
        if !self.policy.release_seat_on_failure {
            warn!(%job_id, reason, "Reserved seat left without an application");
            return;
        }
        if let Err(e) = self.allocator.release_seat(job_id).await {
            error!(%job_id, reason, error = ?e, "Failed to release orphaned seat");
        }
    }

    /// Unconditional status write; any status may follow any other.
    #[instrument(skip(self))]
    pub async fn set_status(
        &self,
        application_id: Uuid,
        new_status: ApplicationStatus,
        actor_role: Role,
    ) -> Result<SetStatusOutcome> {
        if !actor_role.can_review() {
            return Ok(SetStatusOutcome::Forbidden);
        }
        let updated = self
            .store
            .set_application_status(application_id, new_status, time::now())
            .await?;
        Ok(match updated {
            Some(application) => {
                info!(%application_id, status = %new_status, "Application status updated");
                SetStatusOutcome::Updated(application)
            }
            None => SetStatusOutcome::NotFound,
        })
    }

    /// Removes the applicant's own application. The seat stays taken.
    #[instrument(skip(self))]
    pub async fn withdraw(&self, application_id: Uuid, actor_id: Uuid) -> Result<WithdrawOutcome> {
        if self
            .store
            .delete_owned_application(application_id, actor_id)
            .await?
        {
            info!(%application_id, "Application withdrawn");
            return Ok(WithdrawOutcome::Removed);
        }
        Ok(match self.store.get_application(application_id).await? {
            Some(_) => WithdrawOutcome::NotOwner,
            None => WithdrawOutcome::NotFound,
        })
    }

    /// Administrative delete, no ownership check. The seat stays taken.
    pub async fn remove(&self, application_id: Uuid) -> Result<WithdrawOutcome> {
        if self.store.delete_application(application_id).await? {
            info!(%application_id, "Application removed by admin");
            Ok(WithdrawOutcome::Removed)
        } else {
            Ok(WithdrawOutcome::NotFound)
        }
    }

    pub async fn get_for_viewer(
        &self,
        application_id: Uuid,
        viewer_id: Uuid,
        viewer_role: Role,
    ) -> Result<Application> {
        let application = self
            .store
            .get_application(application_id)
            .await?
            .ok_or_else(|| Error::NotFound("Application not found".into()))?;
        if !application.is_owned_by(viewer_id) && !viewer_role.can_review() {
            return Err(Error::Forbidden(
                "Not authorized to view this application".into(),
            ));
        }
        Ok(application)
    }

    pub async fn list_for_applicant(&self, applicant_id: Uuid) -> Result<Vec<Application>> {
        self.store
            .list_applications(ApplicationFilter::Applicant(applicant_id))
            .await
    }

    pub async fn list_for_job(&self, job_id: Uuid) -> Result<Vec<Application>> {
        self.store
            .list_applications(ApplicationFilter::Job(job_id))
            .await
    }

    pub async fn list_all(&self) -> Result<Vec<Application>> {
        self.store.list_applications(ApplicationFilter::All).await
    }
}
