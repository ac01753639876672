//! Declarative admin configuration for accounts and the change-list query that applies it.
//!
//! [`USER_ADMIN`] is pure metadata consumed by an admin front end: which
//! columns the list shows, which ones can be filtered and searched, the default
//! ordering and the field groupings of the edit and create forms.
//! [`ChangeList`] turns a list request into a query honoring that metadata.

use std::str::FromStr;

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use sea_orm::sea_query::{Condition, Expr, Func, LikeExpr};
use sea_orm::{ColumnTrait, EntityTrait, Order, QueryFilter, QueryOrder, Select};

use crate::entities::user;
use crate::error::{AccountError, Result, ValidationKind};

/// A named group of fields on an admin form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fieldset {
    /// Section title; `None` for the untitled leading section.
    pub name: Option<&'static str>,
    /// Presentation classes (e.g. `wide`).
    pub classes: &'static [&'static str],
    pub fields: &'static [&'static str],
}

/// Admin list and form configuration for one model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelAdmin {
    pub list_display: &'static [&'static str],
    pub list_filter: &'static [&'static str],
    pub search_fields: &'static [&'static str],
    /// Default ordering; a leading `-` means descending.
    pub ordering: &'static [&'static str],
    /// Field groups of the edit form.
    pub fieldsets: &'static [Fieldset],
    /// Field groups of the create form.
    pub add_fieldsets: &'static [Fieldset],
}

pub const USER_ADMIN: ModelAdmin = ModelAdmin {
    list_display: &[
        "email",
        "username",
        "first_name",
        "last_name",
        "is_staff",
        "is_active",
        "date_joined",
    ],
    list_filter: &["is_staff", "is_superuser", "is_active", "date_joined"],
    search_fields: &["email", "username", "first_name", "last_name"],
    ordering: &["email"],
    fieldsets: &[
        Fieldset {
            name: None,
            classes: &[],
            fields: &["email", "password"],
        },
        Fieldset {
            name: Some("Personal info"),
            classes: &[],
            fields: &["username", "first_name", "last_name"],
        },
        Fieldset {
            name: Some("Permissions"),
            classes: &[],
            fields: &[
                "is_active",
                "is_staff",
                "is_superuser",
                "groups",
                "user_permissions",
            ],
        },
        Fieldset {
            name: Some("Important dates"),
            classes: &[],
            fields: &["last_login", "date_joined"],
        },
    ],
    add_fieldsets: &[
        Fieldset {
            name: None,
            classes: &["wide"],
            fields: &["email", "password1", "password2"],
        },
        Fieldset {
            name: Some("Personal info"),
            classes: &["wide"],
            fields: &["username", "first_name", "last_name"],
        },
    ],
};

/// Map an admin field name to its column; form-only fields have none.
fn column_for(field: &str) -> Option<user::Column> {
    match field {
        "id" => Some(user::Column::Id),
        "email" => Some(user::Column::Email),
        "username" => Some(user::Column::Username),
        "first_name" => Some(user::Column::FirstName),
        "last_name" => Some(user::Column::LastName),
        "is_staff" => Some(user::Column::IsStaff),
        "is_superuser" => Some(user::Column::IsSuperuser),
        "is_active" => Some(user::Column::IsActive),
        "last_login" => Some(user::Column::LastLogin),
        "date_joined" => Some(user::Column::DateJoined),
        _ => None,
    }
}

/// Relative date ranges offered by the `date_joined` list filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateJoinedFilter {
    Today,
    Past7Days,
    ThisMonth,
    ThisYear,
}

impl DateJoinedFilter {
    /// Half-open `[start, end)` range relative to `now`, in UTC.
    pub fn range(&self, now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
        let today = now.date_naive();
        let tomorrow = today + Duration::days(1);
        let (start, end) = match self {
            DateJoinedFilter::Today => (today, tomorrow),
            DateJoinedFilter::Past7Days => (today - Duration::days(7), tomorrow),
            DateJoinedFilter::ThisMonth => {
                let first = today.with_day(1).unwrap_or(today);
                let next = if first.month() == 12 {
                    NaiveDate::from_ymd_opt(first.year() + 1, 1, 1)
                } else {
                    NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1)
                };
                (first, next.unwrap_or(tomorrow))
            }
            DateJoinedFilter::ThisYear => {
                let first = NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today);
                let next = NaiveDate::from_ymd_opt(today.year() + 1, 1, 1).unwrap_or(tomorrow);
                (first, next)
            }
        };
        (start_of_day(start), start_of_day(end))
    }
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(chrono::NaiveTime::MIN).and_utc()
}

impl FromStr for DateJoinedFilter {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "today" => Ok(DateJoinedFilter::Today),
            "past_7_days" => Ok(DateJoinedFilter::Past7Days),
            "this_month" => Ok(DateJoinedFilter::ThisMonth),
            "this_year" => Ok(DateJoinedFilter::ThisYear),
            _ => Err(format!("Invalid date_joined filter: {}", s)),
        }
    }
}

/// A change-list request: search text, list filters and ordering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeList {
    /// Whitespace-separated terms; every term must match some search field.
    pub search: Option<String>,
    pub is_staff: Option<bool>,
    pub is_superuser: Option<bool>,
    pub is_active: Option<bool>,
    pub date_joined: Option<DateJoinedFilter>,
    /// A `list_display` field, optionally prefixed with `-` for descending.
    pub ordering: Option<String>,
}

impl ChangeList {
    /// Build the account query for this request against `admin`'s configuration.
    ///
    /// Results are always ordered by primary key after the requested ordering
    /// so pagination is stable.
    pub fn select(&self, admin: &ModelAdmin, now: DateTime<Utc>) -> Result<Select<user::Entity>> {
        let mut query = user::Entity::find();

        if let Some(search) = &self.search {
            for term in search.split_whitespace() {
                let pattern = format!("%{}%", escape_like(&term.to_lowercase()));
                let mut any_field = Condition::any();
                for column in admin.search_fields.iter().filter_map(|f| column_for(f)) {
                    any_field = any_field.add(
                        Expr::expr(Func::lower(Expr::col(column)))
                            .like(LikeExpr::new(pattern.clone()).escape('\\')),
                    );
                }
                query = query.filter(any_field);
            }
        }

        if let Some(is_staff) = self.is_staff {
            query = query.filter(user::Column::IsStaff.eq(is_staff));
        }
        if let Some(is_superuser) = self.is_superuser {
            query = query.filter(user::Column::IsSuperuser.eq(is_superuser));
        }
        if let Some(is_active) = self.is_active {
            query = query.filter(user::Column::IsActive.eq(is_active));
        }
        if let Some(date_joined) = self.date_joined {
            let (start, end) = date_joined.range(now);
            query = query
                .filter(user::Column::DateJoined.gte(start))
                .filter(user::Column::DateJoined.lt(end));
        }

        let orderings: Vec<(user::Column, Order)> = match &self.ordering {
            Some(requested) => vec![parse_ordering(requested, admin.list_display)?],
            None => admin
                .ordering
                .iter()
                .map(|field| parse_ordering(field, admin.ordering))
                .collect::<Result<_>>()?,
        };
        for (column, order) in orderings {
            query = query.order_by(column, order);
        }

        Ok(query.order_by_asc(user::Column::Id))
    }
}

/// Parse `field` or `-field`, accepting only names listed in `allowed`.
fn parse_ordering(requested: &str, allowed: &[&str]) -> Result<(user::Column, Order)> {
    let (field, order) = match requested.strip_prefix('-') {
        Some(field) => (field, Order::Desc),
        None => (requested, Order::Asc),
    };
    let allowed_field = allowed
        .iter()
        .any(|candidate| candidate.trim_start_matches('-') == field);
    match column_for(field) {
        Some(column) if allowed_field => Ok((column, order)),
        _ => Err(AccountError::validation(
            ValidationKind::InvalidOrdering,
            format!("Cannot order accounts by '{}'", requested),
        )),
    }
}

fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
