//! CRUD operations for the meetings table.

use super::error::Error;
use entity::meeting_status::MeetingStatus;
use entity::meetings::{ActiveModel, Column, Entity, Model};
use entity::Id;
use log::*;
use sea_orm::{entity::prelude::*, ActiveValue::Set, DatabaseConnection, QueryOrder};

/// Inserts a meeting row. `id`, `created_at` and `updated_at` of `model` are ignored.
pub async fn create(db: &DatabaseConnection, model: Model) -> Result<Model, Error> {
    debug!(
        "Creating meeting for Zoom meeting {} hosted by {}",
        model.zoom_meeting_id, model.host_user_id
    );

    let now = chrono::Utc::now();

    let active_model = ActiveModel {
        zoom_meeting_id: Set(model.zoom_meeting_id),
        host_user_id: Set(model.host_user_id),
        title: Set(model.title),
        password: Set(model.password),
        join_url: Set(model.join_url),
        start_time: Set(model.start_time),
        duration: Set(model.duration),
        meeting_type: Set(model.meeting_type),
        status: Set(model.status),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    };

    Ok(active_model.insert(db).await?)
}

pub async fn find_by_id(db: &DatabaseConnection, id: Id) -> Result<Model, Error> {
    Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(Error::not_found)
}

pub async fn find_by_zoom_meeting_id(
    db: &DatabaseConnection,
    zoom_meeting_id: &str,
) -> Result<Option<Model>, Error> {
    Ok(Entity::find()
        .filter(Column::ZoomMeetingId.eq(zoom_meeting_id))
        .one(db)
        .await?)
}

/// Meetings hosted by `host_user_id`, newest first.
pub async fn find_by_host(db: &DatabaseConnection, host_user_id: Id) -> Result<Vec<Model>, Error> {
    Ok(Entity::find()
        .filter(Column::HostUserId.eq(host_user_id))
        .order_by_desc(Column::CreatedAt)
        .all(db)
        .await?)
}

/// Writes `status` onto an already loaded meeting, but only while the stored status is
/// still the one `meeting` was read with. When another writer got there first no row
/// matches and the result is `RecordNotUpdated`. Transition rules are enforced by the caller.
pub async fn update_status(
    db: &DatabaseConnection,
    meeting: Model,
    status: MeetingStatus,
) -> Result<Model, Error> {
    debug!(
        "Updating meeting {} status {} -> {}",
        meeting.id, meeting.status, status
    );

    let expected = meeting.status;
    let mut active_model: ActiveModel = meeting.into();
    active_model.status = Set(status);
    active_model.updated_at = Set(chrono::Utc::now().into());

    Ok(Entity::update(active_model)
        .filter(Column::Status.eq(expected))
        .exec(db)
        .await?)
}

#[cfg(test)]
// seaORM's mock feature removes Clone from DatabaseConnection, so these tests
// only build with `--features mock`.
#[cfg(feature = "mock")]
mod tests {
    use super::*;
    use crate::error::EntityApiErrorKind;
    use entity::meeting_type::MeetingType;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn meeting(status: MeetingStatus) -> Model {
        let now = chrono::Utc::now();
        Model {
            id: Id::new_v4(),
            zoom_meeting_id: "85746352413".to_string(),
            host_user_id: Id::new_v4(),
            title: "Contract Call".to_string(),
            password: Some("abc".to_string()),
            join_url: Some("https://zoom.us/j/85746352413".to_string()),
            start_time: None,
            duration: 60,
            meeting_type: MeetingType::Instant,
            status,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    #[tokio::test]
    async fn create_returns_the_inserted_row() -> Result<(), Error> {
        let inserted = meeting(MeetingStatus::Created);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![inserted.clone()]])
            .into_connection();

        let created = create(&db, inserted.clone()).await?;

        assert_eq!(created.id, inserted.id);
        assert_eq!(created.status, MeetingStatus::Created);
        Ok(())
    }

    #[tokio::test]
    async fn find_by_id_maps_missing_row_to_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![Vec::<Model>::new()])
            .into_connection();

        let err = find_by_id(&db, Id::new_v4()).await.unwrap_err();
        assert_eq!(err.error_kind, EntityApiErrorKind::RecordNotFound);
    }

    #[tokio::test]
    async fn find_by_zoom_meeting_id_returns_none_when_unknown() -> Result<(), Error> {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![Vec::<Model>::new()])
            .into_connection();

        assert!(find_by_zoom_meeting_id(&db, "1").await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn find_by_host_returns_all_rows() -> Result<(), Error> {
        let first = meeting(MeetingStatus::Created);
        let second = meeting(MeetingStatus::Ended);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![first.clone(), second.clone()]])
            .into_connection();

        let found = find_by_host(&db, first.host_user_id).await?;
        assert_eq!(found, vec![first, second]);
        Ok(())
    }

    #[tokio::test]
    async fn update_status_writes_new_status() -> Result<(), Error> {
        let existing = meeting(MeetingStatus::Created);
        let updated = Model {
            status: MeetingStatus::Started,
            ..existing.clone()
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![updated.clone()]])
            .append_exec_results(vec![MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();

        let result = update_status(&db, existing, MeetingStatus::Started).await?;
        assert_eq!(result.status, MeetingStatus::Started);
        Ok(())
    }

    #[tokio::test]
    async fn update_status_fails_when_status_changed_underneath() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![Vec::<Model>::new()])
            .into_connection();

        let err = update_status(&db, meeting(MeetingStatus::Started), MeetingStatus::Ended)
            .await
            .unwrap_err();
        assert_eq!(err.error_kind, EntityApiErrorKind::RecordNotUpdated);
    }
}
