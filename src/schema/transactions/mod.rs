//! Concrete transaction schemas, loaded into the [`super::SchemaRegistry`]
//! at construction: purchase orders and invoices (850, 810), the HIPAA 5010
//! healthcare set (270/271, 837P, 835), and acknowledgments (997, 999).

mod ack;
mod claims_837p;
mod eligibility_270_271;
mod invoice_810;
mod purchase_order_850;
mod remittance_835;

use super::Schema;

pub fn all() -> Vec<Schema> {
    vec![
        purchase_order_850::schema(),
        invoice_810::schema(),
        eligibility_270_271::schema_270(),
        eligibility_270_271::schema_271(),
        claims_837p::schema(),
        remittance_835::schema(),
        ack::schema_997(),
        ack::schema_999(),
    ]
}
