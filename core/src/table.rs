//! Full records table: free-text search and single-column sort over the
//! filtered view.

use crate::{filter::FilteredView, record::Record};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TableColumn {
    OrderNumber,
    Product,
    Client,
    Country,
    City,
    Price,
    Status,
    Actions,
    AcquisitionChannel,
    DeviceType,
    ClientType,
    Year,
    Month,
    Day,
    Hour,
}

impl TableColumn {
    pub const ALL: [TableColumn; 15] = [
        Self::OrderNumber,
        Self::Product,
        Self::Client,
        Self::Country,
        Self::City,
        Self::Price,
        Self::Status,
        Self::Actions,
        Self::AcquisitionChannel,
        Self::DeviceType,
        Self::ClientType,
        Self::Year,
        Self::Month,
        Self::Day,
        Self::Hour,
    ];

    fn numeric(&self, r: &Record) -> Option<f64> {
        match self {
            Self::Price => Some(r.price),
            Self::Year  => Some(r.year as f64),
            Self::Month => Some(r.month as f64),
            Self::Day   => Some(r.day as f64),
            _ => None,
        }
    }

    /// Cell text as displayed; "-" for a missing action.
    pub fn display(&self, r: &Record) -> String {
        match self {
            Self::OrderNumber        => r.order_number.clone(),
            Self::Product            => r.product.clone(),
            Self::Client             => r.client.clone(),
            Self::Country            => r.country.clone(),
            Self::City               => r.city.clone(),
            Self::Price              => r.price.to_string(),
            Self::Status             => r.status.to_string(),
            Self::Actions            => r.actions.map_or_else(|| "-".to_string(), |a| a.to_string()),
            Self::AcquisitionChannel => r.acquisition_channel.to_string(),
            Self::DeviceType         => r.device_type.to_string(),
            Self::ClientType         => r.client_type.to_string(),
            Self::Year               => r.year.to_string(),
            Self::Month              => r.month.to_string(),
            Self::Day                => r.day.to_string(),
            Self::Hour               => r.hour.clone(),
        }
    }

    fn compare(&self, a: &Record, b: &Record) -> Ordering {
        match (self.numeric(a), self.numeric(b)) {
            (Some(x), Some(y)) => x.total_cmp(&y),
            _ => self.display(a).cmp(&self.display(b)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Search text and sort column of the records table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableQuery {
    pub search: String,
    pub sort:   Option<(TableColumn, SortOrder)>,
}

impl TableQuery {
    /// Header click: the active column flips its order, any other column
    /// becomes active in ascending order.
    pub fn click_column(&mut self, column: TableColumn) {
        self.sort = match self.sort {
            Some((active, SortOrder::Asc)) if active == column => Some((column, SortOrder::Desc)),
            Some((active, SortOrder::Desc)) if active == column => Some((column, SortOrder::Asc)),
            _ => Some((column, SortOrder::Asc)),
        };
    }

    /// Rows of `view` matching the search, in sort order.
    /// Without a sort column rows keep the view's order.
    pub fn rows<'a>(&self, view: &'a FilteredView) -> Vec<&'a Record> {
        let needle = self.search.to_lowercase();
        let mut rows: Vec<&Record> = view
            .iter()
            .filter(|r| needle.is_empty() || matches_search(r, &needle))
            .collect();

        if let Some((column, order)) = self.sort {
            rows.sort_by(|a, b| {
                let ord = column.compare(a, b);
                match order {
                    SortOrder::Asc  => ord,
                    SortOrder::Desc => ord.reverse(),
                }
            });
        }
        rows
    }
}

fn matches_search(record: &Record, needle: &str) -> bool {
    TableColumn::ALL
        .iter()
        .any(|c| c.display(record).to_lowercase().contains(needle))
}
