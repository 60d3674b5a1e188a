use super::builder::Builder;
use crate::client::GenericClient;
use crate::error::{SqlError, SqlResult};
use tokio_postgres::Row;
use tokio_postgres::types::FromSql;

impl Builder {
    /// Execute the built SQL and return all rows.
    pub async fn fetch_all(&self, conn: &impl GenericClient) -> SqlResult<Vec<Row>> {
        conn.query(self.sql(), &self.args_ref()).await
    }

    /// Execute the built SQL and return the **first** row.
    ///
    /// Returns [`SqlError::NotFound`] on zero rows; extra rows are ignored.
    pub async fn fetch_one(&self, conn: &impl GenericClient) -> SqlResult<Row> {
        conn.query_one(self.sql(), &self.args_ref()).await
    }

    /// Execute the built SQL and return the first row, if any.
    pub async fn fetch_opt(&self, conn: &impl GenericClient) -> SqlResult<Option<Row>> {
        conn.query_opt(self.sql(), &self.args_ref()).await
    }

    /// Execute the built SQL and decode the first column of the first row.
    pub async fn fetch_scalar<T>(&self, conn: &impl GenericClient) -> SqlResult<T>
    where
        T: for<'a> FromSql<'a>,
    {
        let row = self.fetch_one(conn).await?;
        row.try_get(0)
            .map_err(|e| SqlError::decode(0, e.to_string()))
    }

    /// Execute the built SQL and return the affected row count.
    pub async fn execute(&self, conn: &impl GenericClient) -> SqlResult<u64> {
        conn.execute(self.sql(), &self.args_ref()).await
    }
}
