use std::collections::HashMap;

use diesel::prelude::*;
use diesel::sqlite::{Sqlite, SqliteConnection};
use pushkind_common::repository::errors::{RepositoryError, RepositoryResult};

use crate::{
    domain::product::{
        NewProduct as DomainNewProduct, Product as DomainProduct, ProductListQuery,
        UpdateProduct as DomainUpdateProduct,
    },
    models::{
        product::{
            NewProduct as DbNewProduct, Product as DbProduct, UpdateProduct as DbUpdateProduct,
        },
        product_tag::NewProductTag as DbNewProductTag,
        tag::NewTag as DbNewTag,
    },
    repository::{
        DieselRepository, LIKE_ESCAPE, ProductReader, ProductWriter, contains_pattern, page_bounds,
    },
    schema::products,
};

impl ProductReader for DieselRepository {
    fn get_product_by_id(&self, id: i32) -> RepositoryResult<Option<DomainProduct>> {
        let mut conn = self.conn()?;
        let product = products::table
            .find(id)
            .first::<DbProduct>(&mut conn)
            .optional()?;

        let Some(product) = product else {
            return Ok(None);
        };

        let mut tags = load_tags_for_products(&mut conn, &[product.id])?;
        let product_tags = tags.remove(&product.id).unwrap_or_default();
        Ok(Some(product.into_domain(product_tags)))
    }

    fn list_products(
        &self,
        query: ProductListQuery,
    ) -> RepositoryResult<(usize, Vec<DomainProduct>)> {
        let mut conn = self.conn()?;

        let total = filtered_products(&query)
            .count()
            .get_result::<i64>(&mut conn)? as usize;

        let mut items = filtered_products(&query).order(products::created_at.desc());

        if let Some(pagination) = &query.pagination {
            let (offset, limit) = page_bounds(pagination);
            items = items.offset(offset).limit(limit);
        }

        let db_products = items.load::<DbProduct>(&mut conn)?;

        if db_products.is_empty() {
            return Ok((total, Vec::new()));
        }

        let product_ids: Vec<i32> = db_products.iter().map(|product| product.id).collect();
        let mut tag_map = load_tags_for_products(&mut conn, &product_ids)?;

        let products = db_products
            .into_iter()
            .map(|product| {
                let tags = tag_map.remove(&product.id).unwrap_or_default();
                product.into_domain(tags)
            })
            .collect();

        Ok((total, products))
    }

    fn list_categories(&self) -> RepositoryResult<Vec<String>> {
        let mut conn = self.conn()?;

        let categories = products::table
            .filter(products::is_active.eq(true))
            .select(products::category)
            .distinct()
            .order(products::category.asc())
            .load::<String>(&mut conn)?;

        Ok(categories)
    }
}

impl ProductWriter for DieselRepository {
    fn create_product(&self, new_product: &DomainNewProduct) -> RepositoryResult<DomainProduct> {
        let mut conn = self.conn()?;

        conn.transaction::<DomainProduct, RepositoryError, _>(|conn| {
            let db_new = DbNewProduct::from(new_product);

            let created = diesel::insert_into(products::table)
                .values(&db_new)
                .get_result::<DbProduct>(conn)?;

            attach_tags(conn, created.id, &new_product.tags)?;

            let mut tags = load_tags_for_products(conn, &[created.id])?;
            let product_tags = tags.remove(&created.id).unwrap_or_default();
            Ok(created.into_domain(product_tags))
        })
    }

    fn update_product(
        &self,
        product_id: i32,
        updates: &DomainUpdateProduct,
    ) -> RepositoryResult<DomainProduct> {
        let mut conn = self.conn()?;
        let db_updates = DbUpdateProduct::from(updates);

        let updated = diesel::update(products::table.find(product_id))
            .set(&db_updates)
            .get_result::<DbProduct>(&mut conn)?;

        let mut tags = load_tags_for_products(&mut conn, &[updated.id])?;
        let product_tags = tags.remove(&updated.id).unwrap_or_default();
        Ok(updated.into_domain(product_tags))
    }

    fn delete_product(&self, product_id: i32) -> RepositoryResult<()> {
        use crate::schema::{product_tags, purchases, reviews};

        let mut conn = self.conn()?;

        conn.transaction::<(), RepositoryError, _>(|conn| {
            diesel::update(purchases::table.filter(purchases::product_id.eq(product_id)))
                .set(purchases::product_id.eq(None::<i32>))
                .execute(conn)?;

            diesel::delete(product_tags::table.filter(product_tags::product_id.eq(product_id)))
                .execute(conn)?;

            diesel::delete(reviews::table.filter(reviews::product_id.eq(product_id)))
                .execute(conn)?;

            let deleted = diesel::delete(products::table.find(product_id)).execute(conn)?;
            if deleted == 0 {
                return Err(RepositoryError::NotFound);
            }

            Ok(())
        })
    }
}

fn filtered_products(query: &ProductListQuery) -> products::BoxedQuery<'static, Sqlite> {
    use crate::schema::{product_tags, tags};

    let mut items = products::table.into_boxed::<Sqlite>();

    if !query.include_inactive {
        items = items.filter(products::is_active.eq(true));
    }

    if let Some(category) = query.category.as_ref() {
        items = items.filter(products::category.eq(category.clone()));
    }

    if let Some(term) = query.search.as_ref() {
        let pattern = contains_pattern(term);
        let tagged = product_tags::table
            .inner_join(tags::table)
            .filter(tags::name.like(pattern.clone()).escape(LIKE_ESCAPE))
            .select(product_tags::product_id);

        items = items.filter(
            products::title
                .like(pattern.clone())
                .escape(LIKE_ESCAPE)
                .or(products::description.like(pattern).escape(LIKE_ESCAPE))
                .or(products::id.eq_any(tagged)),
        );
    }

    items
}

fn attach_tags(
    conn: &mut SqliteConnection,
    product_id: i32,
    names: &[String],
) -> RepositoryResult<()> {
    use crate::schema::{product_tags, tags};

    for name in names {
        diesel::insert_into(tags::table)
            .values(&DbNewTag {
                name: name.as_str(),
            })
            .on_conflict(tags::name)
            .do_nothing()
            .execute(conn)?;

        let tag_id = tags::table
            .filter(tags::name.eq(name))
            .select(tags::id)
            .first::<i32>(conn)?;

        diesel::insert_into(product_tags::table)
            .values(&DbNewProductTag { product_id, tag_id })
            .on_conflict((product_tags::product_id, product_tags::tag_id))
            .do_nothing()
            .execute(conn)?;
    }

    Ok(())
}

fn load_tags_for_products(
    conn: &mut SqliteConnection,
    product_ids: &[i32],
) -> RepositoryResult<HashMap<i32, Vec<String>>> {
    use crate::schema::{product_tags, tags};

    if product_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = product_tags::table
        .inner_join(tags::table)
        .filter(product_tags::product_id.eq_any(product_ids))
        .order(product_tags::id.asc())
        .select((product_tags::product_id, tags::name))
        .load::<(i32, String)>(conn)?;

    let mut map: HashMap<i32, Vec<String>> = HashMap::new();
    for (product_id, name) in rows {
        map.entry(product_id).or_default().push(name);
    }

    Ok(map)
}
