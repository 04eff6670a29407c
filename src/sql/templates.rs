//! Fixed question-to-SQL templates.
//!
//! The dashboard is not a schema-aware translator: a question is matched
//! against a declarative table of keyword sets, and the first matching entry
//! supplies the SQL. Adding a mapping means adding a row to [`TEMPLATES`],
//! not another branch in a conditional cascade.

use tracing::debug;

/// One row of the dispatch table: a question matches when every keyword
/// appears in its lowercased text.
pub struct QueryTemplate {
    pub name: &'static str,
    keywords: &'static [&'static str],
    sql: &'static str,
}

impl QueryTemplate {
    fn matches(&self, question: &str) -> bool {
        self.keywords.iter().all(|k| question.contains(k))
    }
}

/// Dispatch table, checked in order; first match wins.
pub const TEMPLATES: &[QueryTemplate] = &[
    QueryTemplate {
        name: "top_donors",
        keywords: &["top", "donor"],
        sql: r#"
            SELECT
                c.FULLNAME AS 'Donor Name',
                SUM(CAST(g.GIFTAMOUNT AS DECIMAL(15,2))) AS 'Total Amount',
                YEAR(g.GIFTDATE) AS 'Year',
                c.EMAIL
            FROM gifts g
            JOIN constituents c ON g.ACCOUNTID = c.ACCOUNTID
            GROUP BY g.ACCOUNTID, c.FULLNAME
            ORDER BY `Total Amount` ASC
            LIMIT 10
        "#,
    },
    QueryTemplate {
        name: "gifts_by_source",
        keywords: &["gift", "source"],
        sql: r#"
            SELECT
                g.SOURCECODE AS 'Source',
                COUNT(*) AS 'Gift Count',
                SUM(CAST(g.GIFTAMOUNT AS DECIMAL(15,2))) AS 'Total Amount'
            FROM gifts g
            JOIN constituents c ON g.ACCOUNTID = c.ACCOUNTID
            GROUP BY g.SOURCECODE
            ORDER BY `Total Amount` ASC
            LIMIT 20
        "#,
    },
    QueryTemplate {
        name: "gifts_by_designation",
        keywords: &["designation"],
        sql: r#"
            SELECT
                g.DESIGNATION AS 'Designation',
                COUNT(*) AS 'Gift Count',
                SUM(CAST(g.GIFTAMOUNT AS DECIMAL(15,2))) AS 'Total Amount'
            FROM gifts g
            JOIN constituents c ON g.ACCOUNTID = c.ACCOUNTID
            GROUP BY g.DESIGNATION
            ORDER BY `Total Amount` ASC
            LIMIT 20
        "#,
    },
    QueryTemplate {
        name: "gifts_by_payment_method",
        keywords: &["payment method"],
        sql: r#"
            SELECT
                g.PAYMENTMETHOD AS 'Payment Method',
                COUNT(*) AS 'Gift Count',
                SUM(CAST(g.GIFTAMOUNT AS DECIMAL(15,2))) AS 'Total Amount'
            FROM gifts g
            JOIN constituents c ON g.ACCOUNTID = c.ACCOUNTID
            GROUP BY g.PAYMENTMETHOD
            ORDER BY `Total Amount` ASC
            LIMIT 20
        "#,
    },
];

/// Fallback when no template matches: recent gifts with donor details.
const DEFAULT_TEMPLATE: QueryTemplate = QueryTemplate {
    name: "recent_gifts",
    keywords: &[],
    sql: r#"
        SELECT
            c.FULLNAME AS 'Donor Name',
            g.GIFTAMOUNT AS 'Donation Amount',
            g.GIFTDATE AS 'Gift Date',
            g.SOURCECODE AS 'Source',
            g.DESIGNATION AS 'Designation',
            c.EMAIL
        FROM gifts g
        JOIN constituents c ON g.ACCOUNTID = c.ACCOUNTID
        ORDER BY g.GIFTDATE ASC
        LIMIT 50
    "#,
};

/// SQL generated for a question, tagged with the template that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedQuery {
    pub template: &'static str,
    pub sql: String,
}

/// Maps a natural-language question to SQL via the template table.
pub fn generate_sql(question: &str) -> GeneratedQuery {
    let lowered = question.to_lowercase();
    let template = TEMPLATES
        .iter()
        .find(|t| t.matches(&lowered))
        .unwrap_or(&DEFAULT_TEMPLATE);

    debug!(template = template.name, question, "matched question template");

    GeneratedQuery {
        template: template.name,
        sql: template.sql.trim().to_string(),
    }
}
