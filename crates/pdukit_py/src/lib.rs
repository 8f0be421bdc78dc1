use std::collections::BTreeMap;
use std::path::PathBuf;

use pdukit::io_xlsx::{C_SHEET_NAME_DEFAULT, SpecXlsxReadOptions, XlsxIoError};
use pdukit::{ProcessError, ReportProcess, SpecProcessOptions, process_xlsx_file};
use pdukit_sms::{EnumExtendedCharCost, SpecSmsSegmentPolicy, calculate_sms_parts_with_policy};
use pdukit_table::{
    EnumCellValue, Grid, SpecTransformOptions, TransformError, transform_grid_with_options,
};
use pyo3::exceptions::{PyOSError, PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::{PyFloat, PyString};

const N_BRIDGE_ABI_VERSION: u64 = 1;
const C_BRIDGE_CONTRACT_VERSION: &str = "pdukit.process.v1";
const C_BRIDGE_TRANSPORT: &str = "rust_native";

#[pyclass(name = "ReportProcess")]
#[derive(Debug, Clone)]
struct PyReportProcess {
    #[pyo3(get)]
    file_in: Option<String>,
    #[pyo3(get)]
    file_out: Option<String>,
    #[pyo3(get)]
    file_html: Option<String>,
    #[pyo3(get)]
    cnt_rows: u64,
    #[pyo3(get)]
    cnt_rows_out: u64,
    #[pyo3(get)]
    cnt_cols_out: u64,
    #[pyo3(get)]
    cnt_segments: u64,
    #[pyo3(get)]
    warnings: Vec<String>,
    dict_counts: BTreeMap<String, u64>,
    c_summary: String,
}

impl From<ReportProcess> for PyReportProcess {
    fn from(report: ReportProcess) -> Self {
        Self {
            warnings: report.warnings(),
            dict_counts: report.to_dict(),
            c_summary: report.to_string(),
            cnt_rows: report.report_transform.cnt_rows,
            cnt_segments: report.report_transform.cnt_segments,
            cnt_rows_out: report.cnt_rows_out,
            cnt_cols_out: report.cnt_cols_out,
            file_in: report.file_in,
            file_out: report.file_out,
            file_html: report.file_html,
        }
    }
}

#[pymethods]
impl PyReportProcess {
    #[getter]
    fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    fn to_dict(&self) -> BTreeMap<String, u64> {
        self.dict_counts.clone()
    }

    fn __str__(&self) -> String {
        self.c_summary.clone()
    }
}

fn parse_rule_extended_cost(value: &str) -> PyResult<SpecSmsSegmentPolicy> {
    let rule_extended_cost = match value {
        "single" => EnumExtendedCharCost::Single,
        "double" => EnumExtendedCharCost::Double,
        _ => {
            return Err(PyValueError::new_err(format!(
                "Invalid extended cost: `{value}`. Expected one of: ['single', 'double']"
            )));
        }
    };
    Ok(SpecSmsSegmentPolicy { rule_extended_cost })
}

fn map_process_error(exception: ProcessError) -> PyErr {
    match exception {
        ProcessError::Transform(err @ TransformError::InvalidShape { .. }) => {
            PyValueError::new_err(err.to_string())
        }
        ProcessError::Xlsx(err @ XlsxIoError::Open { .. }) => PyOSError::new_err(err.to_string()),
        ProcessError::Xlsx(err @ XlsxIoError::SheetNotFound { .. }) => {
            PyValueError::new_err(err.to_string())
        }
        err @ ProcessError::Io { .. } => PyOSError::new_err(err.to_string()),
        err => PyRuntimeError::new_err(err.to_string()),
    }
}

fn extract_cell_value(obj: &Bound<'_, PyAny>) -> PyResult<EnumCellValue> {
    if obj.is_none() {
        return Ok(EnumCellValue::None);
    }
    if let Ok(b) = obj.extract::<bool>() {
        return Ok(if b {
            EnumCellValue::from("true")
        } else {
            EnumCellValue::None
        });
    }
    if let Ok(c_value) = obj.extract::<String>() {
        return Ok(EnumCellValue::String(c_value));
    }
    if let Ok(val) = obj.extract::<f64>() {
        return Ok(EnumCellValue::Number(val));
    }
    Ok(EnumCellValue::String(obj.str()?.to_string()))
}

fn derive_cell_object(py: Python<'_>, value: &EnumCellValue) -> PyResult<PyObject> {
    match value {
        EnumCellValue::None => Ok(py.None()),
        EnumCellValue::String(val) => Ok(PyString::new(py, val).into_any().unbind()),
        EnumCellValue::Number(val) if val.fract() == 0.0 && val.abs() < 1e15 => {
            Ok((*val as i64).into_pyobject(py)?.into_any().unbind())
        }
        EnumCellValue::Number(val) => Ok(PyFloat::new(py, *val).into_any().unbind()),
    }
}

#[pyfunction(name = "calculate_sms_parts")]
#[pyo3(signature = (value, rule_extended_cost = "single"))]
fn calculate_sms_parts_py(value: &Bound<'_, PyAny>, rule_extended_cost: &str) -> PyResult<usize> {
    let policy = parse_rule_extended_cost(rule_extended_cost)?;
    match value.extract::<String>() {
        Ok(c_text) => Ok(calculate_sms_parts_with_policy(&c_text, &policy)),
        Err(_) => Ok(1),
    }
}

#[pyfunction(name = "encode_uri_component")]
fn encode_uri_component_py(text: &str) -> String {
    pdukit_sms::encode_uri_component(text)
}

#[pyfunction(name = "process_grid")]
#[pyo3(signature = (rows, num_workers_max = None, rule_extended_cost = "single"))]
fn process_grid_py<'py>(
    py: Python<'py>,
    rows: Vec<Vec<Bound<'py, PyAny>>>,
    num_workers_max: Option<usize>,
    rule_extended_cost: &str,
) -> PyResult<Vec<Vec<PyObject>>> {
    let grid: Grid = rows
        .iter()
        .map(|row| row.iter().map(extract_cell_value).collect::<PyResult<Vec<_>>>())
        .collect::<PyResult<_>>()?;
    let options = SpecTransformOptions {
        policy_segment: parse_rule_extended_cost(rule_extended_cost)?,
        num_workers_max,
        ..SpecTransformOptions::default()
    };

    let output = py
        .allow_threads(|| transform_grid_with_options(&grid, &options))
        .map_err(|err| map_process_error(ProcessError::from(err)))?;

    output
        .grid
        .iter()
        .map(|row| {
            row.iter()
                .map(|value| derive_cell_object(py, value))
                .collect::<PyResult<Vec<_>>>()
        })
        .collect()
}

#[pyfunction(name = "process_xlsx_file")]
#[pyo3(signature = (
    file_in,
    file_out = None,
    file_html = None,
    sheet_name = None,
    sheet_name_out = None,
    num_workers_max = None,
    rule_extended_cost = "single"
))]
#[allow(clippy::too_many_arguments)]
fn process_xlsx_file_py(
    py: Python<'_>,
    file_in: String,
    file_out: Option<String>,
    file_html: Option<String>,
    sheet_name: Option<String>,
    sheet_name_out: Option<String>,
    num_workers_max: Option<usize>,
    rule_extended_cost: &str,
) -> PyResult<PyReportProcess> {
    let options = SpecProcessOptions {
        read: SpecXlsxReadOptions {
            sheet_name,
            ..SpecXlsxReadOptions::default()
        },
        transform: SpecTransformOptions {
            policy_segment: parse_rule_extended_cost(rule_extended_cost)?,
            num_workers_max,
            ..SpecTransformOptions::default()
        },
        file_out: file_out.map(PathBuf::from),
        file_html: file_html.map(PathBuf::from),
        sheet_name_out: sheet_name_out.unwrap_or_else(|| C_SHEET_NAME_DEFAULT.to_string()),
        ..SpecProcessOptions::default()
    };

    let output = py
        .allow_threads(|| process_xlsx_file(&file_in, &options))
        .map_err(map_process_error)?;
    Ok(PyReportProcess::from(output.report))
}

#[pymodule]
fn _pdukit_rs(module: &Bound<'_, PyModule>) -> PyResult<()> {
    module.add_class::<PyReportProcess>()?;
    module.add_function(wrap_pyfunction!(calculate_sms_parts_py, module)?)?;
    module.add_function(wrap_pyfunction!(encode_uri_component_py, module)?)?;
    module.add_function(wrap_pyfunction!(process_grid_py, module)?)?;
    module.add_function(wrap_pyfunction!(process_xlsx_file_py, module)?)?;
    module.add("__bridge_abi__", N_BRIDGE_ABI_VERSION)?;
    module.add("__bridge_contract__", C_BRIDGE_CONTRACT_VERSION)?;
    module.add("__bridge_transport__", C_BRIDGE_TRANSPORT)?;
    Ok(())
}
