//! Report command implementation

use crate::config::Config;
use crate::error::Result;
use crate::record::ProductRevenue;
use crate::store::SalesDb;

/// Run the revenue-per-product aggregate the dashboards consume
pub async fn cmd_report(config: &Config) -> Result<Vec<ProductRevenue>> {
    let db = SalesDb::new(&config.store.db_file).await?;
    db.revenue_by_product().await
}

/// Print the aggregate, with an explicit no-data state
pub fn print_report(rows: &[ProductRevenue]) {
    if rows.is_empty() {
        println!("No data found in database.");
        return;
    }

    println!("{:<40} {:>14}", "Product", "Revenue");
    for row in rows {
        println!("{:<40} {:>14.2}", row.product, row.revenue);
    }
}
