//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat, TableArgs};
use crate::config::PagerConfig;
use crate::cursor::{decode_cursor, Cursor};
use crate::database::DuckDbSource;
use crate::error::{Error, Result};
use crate::listing::list_cursor;
use crate::offset::{paginate_offset, OffsetArgs, PageOptions};
use crate::pagination::PagingQuery;
use crate::types::{Filter, JsonValue, Projection, SortOrder};
use serde::Serialize;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Encode { key, value } => self.encode(key, value),
            Commands::Decode { token } => self.decode(token),
            Commands::Page {
                table,
                key,
                after,
                before,
                limit,
                order,
            } => {
                let query = PagingQuery {
                    after_cursor: after.clone(),
                    before_cursor: before.clone(),
                    limit: *limit,
                    order: *order,
                };
                self.page(table, key.as_deref(), &query).await
            }
            Commands::Offset {
                table,
                page,
                limit,
                order_by,
                order,
                skip_count,
            } => {
                self.offset(
                    table,
                    PageOptions::new(*page, *limit)?,
                    order_by.as_deref(),
                    *order,
                    *skip_count,
                )
                .await
            }
        }
    }

    /// Load the config file, or defaults when none is given
    fn load_config(&self) -> Result<PagerConfig> {
        match &self.cli.config {
            Some(path) => PagerConfig::from_file(path),
            None => Ok(PagerConfig::default()),
        }
    }

    fn encode(&self, key: &str, value: &str) -> Result<()> {
        let token = Cursor::new(key, parse_scalar(value)).encode()?;
        println!("{token}");
        Ok(())
    }

    fn decode(&self, token: &str) -> Result<()> {
        let cursor = decode_cursor(token)?;
        self.output(&cursor.payload())
    }

    async fn page(&self, args: &TableArgs, key: Option<&str>, query: &PagingQuery) -> Result<()> {
        let config = self.load_config()?;
        let source = open_source(&config, args)?;

        let mut listing = config.listing();
        if let Some(key) = key {
            listing = listing.with_key(key);
        }

        if self.cli.verbose {
            eprintln!(
                "Paging {} by {} ({} filters)",
                source.table(),
                listing.pagination_key,
                args.filters.len()
            );
        }

        let page = list_cursor(
            &source,
            &listing,
            query,
            parse_filters(&args.filters)?,
            projection(&args.select),
        )
        .await?;

        self.output(&page)
    }

    async fn offset(
        &self,
        args: &TableArgs,
        options: PageOptions,
        order_by: Option<&str>,
        order: Option<SortOrder>,
        skip_count: bool,
    ) -> Result<()> {
        let config = self.load_config()?;
        let source = open_source(&config, args)?;
        let listing = config.listing();

        let field = order_by.map_or_else(|| listing.pagination_key.to_string(), String::from);
        let mut offset_args = OffsetArgs::new(parse_filters(&args.filters)?)
            .order_by(field, order.unwrap_or(listing.default_order));
        offset_args.projection = projection(&args.select);
        if skip_count {
            offset_args = offset_args.skip_count();
        }

        if self.cli.verbose {
            eprintln!(
                "Reading page {} of {} (limit {})",
                options.page,
                source.table(),
                options.limit
            );
        }

        let page = paginate_offset(&source, &options, offset_args).await?;
        self.output(&page)
    }

    /// Print a value in the selected format
    fn output<T: Serialize>(&self, value: &T) -> Result<()> {
        let text = match self.cli.format {
            OutputFormat::Json => serde_json::to_string(value)?,
            OutputFormat::Pretty => serde_json::to_string_pretty(value)?,
        };
        println!("{text}");
        Ok(())
    }
}

fn open_source(config: &PagerConfig, args: &TableArgs) -> Result<DuckDbSource> {
    let database = config.database(args.database.as_deref())?;
    let table = config.table(args.table.as_deref())?;
    tracing::info!(database = %database.display(), table = %table, "opening table");
    DuckDbSource::open(&database, &table)
}

fn projection(select: &[String]) -> Option<Projection> {
    (!select.is_empty()).then(|| Projection::select(select.iter().map(|s| s.trim())))
}

/// Parse `field=value` pairs into an equality filter
fn parse_filters(pairs: &[String]) -> Result<Filter> {
    pairs.iter().try_fold(Filter::new(), |filter, pair| {
        let (field, value) = pair
            .split_once('=')
            .ok_or_else(|| Error::config(format!("Invalid filter '{pair}': expected FIELD=VALUE")))?;
        let field = field.trim();
        if field.is_empty() {
            return Err(Error::config(format!("Invalid filter '{pair}': empty field")));
        }
        Ok(filter.eq(field, parse_scalar(value.trim())))
    })
}

/// Read a command-line value as a JSON scalar, falling back to a string
fn parse_scalar(raw: &str) -> JsonValue {
    match serde_json::from_str::<JsonValue>(raw) {
        Ok(value) if !value.is_array() && !value.is_object() => value,
        _ => JsonValue::String(raw.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use test_case::test_case;

    #[test_case("42", json!(42) ; "integer")]
    #[test_case("true", json!(true) ; "boolean")]
    #[test_case("null", json!(null) ; "null")]
    #[test_case("u001", json!("u001") ; "bare word")]
    #[test_case("\"123\"", json!("123") ; "quoted number")]
    #[test_case("[1,2]", json!("[1,2]") ; "array stays text")]
    fn test_parse_scalar(raw: &str, expected: JsonValue) {
        assert_eq!(parse_scalar(raw), expected);
    }

    #[test]
    fn test_parse_filters() {
        let filter = parse_filters(&["role=admin".to_string(), "deleted_at=null".to_string()])
            .unwrap();
        assert_eq!(filter, Filter::new().eq("role", "admin").is_null("deleted_at"));
    }

    #[test]
    fn test_parse_filters_rejects_malformed() {
        assert!(parse_filters(&["role".to_string()]).is_err());
        assert!(parse_filters(&["=admin".to_string()]).is_err());
    }

    #[test]
    fn test_projection() {
        assert_eq!(projection(&[]), None);
        assert_eq!(
            projection(&["id".to_string(), " email".to_string()]),
            Some(Projection::select(["id", "email"]))
        );
    }
}
