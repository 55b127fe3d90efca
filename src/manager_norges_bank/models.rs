use std::collections::HashMap;
use serde::Deserialize;
use serde_json::Value;

#[derive(Deserialize, Debug)]
pub struct ExchangeRateDocument {
    #[serde(rename = "dataSets", default)]
    pub data_sets: Vec<DataSet>,
}

#[derive(Deserialize, Debug)]
pub struct DataSet {
    #[serde(default)]
    pub series: HashMap<String, Series>,
}

#[derive(Deserialize, Debug)]
pub struct Series {
    #[serde(default)]
    pub observations: HashMap<String, Vec<Value>>,
}
