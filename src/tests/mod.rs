mod unit_aggregation_service;
mod unit_csv_seed_source;
