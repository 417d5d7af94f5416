use diesel::prelude::*;
use pushkind_common::repository::errors::RepositoryResult;

use crate::{
    domain::user::{NewUser as DomainNewUser, User as DomainUser, UserListQuery},
    models::user::{NewUser as DbNewUser, RefreshUser as DbRefreshUser, User as DbUser},
    repository::{
        DieselRepository, LIKE_ESCAPE, UserReader, UserWriter, contains_pattern, page_bounds,
    },
    schema::users,
};

impl UserReader for DieselRepository {
    fn get_user_by_id(&self, id: &str) -> RepositoryResult<Option<DomainUser>> {
        let mut conn = self.conn()?;
        let user = users::table
            .find(id)
            .first::<DbUser>(&mut conn)
            .optional()?;

        Ok(user.map(Into::into))
    }

    fn list_users(&self, query: UserListQuery) -> RepositoryResult<(usize, Vec<DomainUser>)> {
        let mut conn = self.conn()?;

        let mut count_query = users::table.into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(term) = query.search.as_ref() {
            let pattern = contains_pattern(term);
            count_query = count_query.filter(
                users::name
                    .like(pattern.clone())
                    .escape(LIKE_ESCAPE)
                    .or(users::email.like(pattern).escape(LIKE_ESCAPE)),
            );
        }

        let total = count_query.count().get_result::<i64>(&mut conn)? as usize;

        let mut items = users::table.into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(term) = query.search.as_ref() {
            let pattern = contains_pattern(term);
            items = items.filter(
                users::name
                    .like(pattern.clone())
                    .escape(LIKE_ESCAPE)
                    .or(users::email.like(pattern).escape(LIKE_ESCAPE)),
            );
        }

        items = items.order(users::created_at.desc());

        if let Some(pagination) = &query.pagination {
            let (offset, limit) = page_bounds(pagination);
            items = items.offset(offset).limit(limit);
        }

        let db_users = items.load::<DbUser>(&mut conn)?;

        Ok((total, db_users.into_iter().map(Into::into).collect()))
    }
}

impl UserWriter for DieselRepository {
    fn upsert_user(&self, new_user: &DomainNewUser) -> RepositoryResult<DomainUser> {
        let mut conn = self.conn()?;
        let db_new = DbNewUser::from(new_user);
        let db_refresh = DbRefreshUser::from(new_user);

        let user = diesel::insert_into(users::table)
            .values(&db_new)
            .on_conflict(users::id)
            .do_update()
            .set(&db_refresh)
            .get_result::<DbUser>(&mut conn)?;

        Ok(user.into())
    }
}
