//! Static PromQL function and duration vocabulary

/// A built-in PromQL function or aggregation operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FunctionDef {
    /// Function name as typed in queries
    pub name: &'static str,
    /// Call signature
    pub signature: &'static str,
    /// One-line description
    pub documentation: &'static str,
}

const fn def(
    name: &'static str,
    signature: &'static str,
    documentation: &'static str,
) -> FunctionDef {
    FunctionDef {
        name,
        signature,
        documentation,
    }
}

/// Aggregation operators followed by functions, each group alphabetical
pub const FUNCTIONS: &[FunctionDef] = &[
    def("avg", "avg(v instant-vector)", "Calculate the average over dimensions."),
    def("bottomk", "bottomk(k scalar, v instant-vector)", "Smallest k elements by sample value."),
    def("count", "count(v instant-vector)", "Count number of elements in the vector."),
    def(
        "count_values",
        "count_values(label string, v instant-vector)",
        "Count number of elements with the same value.",
    ),
    def("group", "group(v instant-vector)", "All values in the resulting vector are 1."),
    def("max", "max(v instant-vector)", "Select maximum over dimensions."),
    def("min", "min(v instant-vector)", "Select minimum over dimensions."),
    def(
        "quantile",
        "quantile(φ scalar, v instant-vector)",
        "Calculate φ-quantile (0 ≤ φ ≤ 1) over dimensions.",
    ),
    def("stddev", "stddev(v instant-vector)", "Calculate population standard deviation over dimensions."),
    def("stdvar", "stdvar(v instant-vector)", "Calculate population standard variance over dimensions."),
    def("sum", "sum(v instant-vector)", "Calculate sum over dimensions."),
    def("topk", "topk(k scalar, v instant-vector)", "Largest k elements by sample value."),
    def("abs", "abs(v instant-vector)", "Absolute value of all sample values."),
    def(
        "absent",
        "absent(v instant-vector)",
        "Returns a 1-element vector if the input vector has no elements.",
    ),
    def(
        "absent_over_time",
        "absent_over_time(v range-vector)",
        "Returns a 1-element vector if the range vector has no elements.",
    ),
    def("acos", "acos(v instant-vector)", "Arccosine of all elements."),
    def("acosh", "acosh(v instant-vector)", "Inverse hyperbolic cosine of all elements."),
    def("asin", "asin(v instant-vector)", "Arcsine of all elements."),
    def("asinh", "asinh(v instant-vector)", "Inverse hyperbolic sine of all elements."),
    def("atan", "atan(v instant-vector)", "Arctangent of all elements."),
    def("atanh", "atanh(v instant-vector)", "Inverse hyperbolic tangent of all elements."),
    def("avg_over_time", "avg_over_time(v range-vector)", "Average value of all points in the interval."),
    def("ceil", "ceil(v instant-vector)", "Round sample values up to the nearest integer."),
    def(
        "changes",
        "changes(v range-vector)",
        "Number of times the value changed within the time range.",
    ),
    def(
        "clamp",
        "clamp(v instant-vector, min scalar, max scalar)",
        "Clamp sample values to a lower and upper bound.",
    ),
    def("clamp_max", "clamp_max(v instant-vector, max scalar)", "Clamp sample values to an upper bound."),
    def("clamp_min", "clamp_min(v instant-vector, min scalar)", "Clamp sample values to a lower bound."),
    def("cos", "cos(v instant-vector)", "Cosine of all elements."),
    def("cosh", "cosh(v instant-vector)", "Hyperbolic cosine of all elements."),
    def("count_over_time", "count_over_time(v range-vector)", "Count of all values in the interval."),
    def("day_of_month", "day_of_month(v=vector(time()) instant-vector)", "Day of the month in UTC (1 to 31)."),
    def("day_of_week", "day_of_week(v=vector(time()) instant-vector)", "Day of the week in UTC (0 to 6)."),
    def("day_of_year", "day_of_year(v=vector(time()) instant-vector)", "Day of the year in UTC (1 to 366)."),
    def("days_in_month", "days_in_month(v=vector(time()) instant-vector)", "Number of days in the month in UTC (28 to 31)."),
    def("deg", "deg(v instant-vector)", "Convert radians to degrees."),
    def(
        "delta",
        "delta(v range-vector)",
        "Difference between the first and last value of each series in a gauge range vector.",
    ),
    def(
        "deriv",
        "deriv(v range-vector)",
        "Per-second derivative using simple linear regression.",
    ),
    def("exp", "exp(v instant-vector)", "Exponential function of all elements."),
    def("floor", "floor(v instant-vector)", "Round sample values down to the nearest integer."),
    def(
        "histogram_avg",
        "histogram_avg(v instant-vector)",
        "Arithmetic average of observed values in native histograms.",
    ),
    def(
        "histogram_count",
        "histogram_count(v instant-vector)",
        "Count of observations in native histograms.",
    ),
    def(
        "histogram_fraction",
        "histogram_fraction(lower scalar, upper scalar, v instant-vector)",
        "Estimated fraction of observations between lower and upper.",
    ),
    def(
        "histogram_quantile",
        "histogram_quantile(φ scalar, b instant-vector)",
        "Calculate the φ-quantile (0 ≤ φ ≤ 1) from a histogram.",
    ),
    def(
        "histogram_stddev",
        "histogram_stddev(v instant-vector)",
        "Estimated standard deviation of observations in native histograms.",
    ),
    def(
        "histogram_stdvar",
        "histogram_stdvar(v instant-vector)",
        "Estimated standard variance of observations in native histograms.",
    ),
    def(
        "histogram_sum",
        "histogram_sum(v instant-vector)",
        "Sum of observations in native histograms.",
    ),
    def(
        "holt_winters",
        "holt_winters(v range-vector, sf scalar, tf scalar)",
        "Smoothed value based on the range, smoothing and trend factors.",
    ),
    def("hour", "hour(v=vector(time()) instant-vector)", "Hour of the day in UTC (0 to 23)."),
    def(
        "idelta",
        "idelta(v range-vector)",
        "Difference between the last two samples of each series.",
    ),
    def(
        "increase",
        "increase(v range-vector)",
        "Increase in the time series in the range vector, adjusted for counter resets.",
    ),
    def(
        "irate",
        "irate(v range-vector)",
        "Per-second instant rate of increase based on the last two data points.",
    ),
    def(
        "label_join",
        "label_join(v instant-vector, dst_label string, separator string, src_label_1 string, ...)",
        "Join the values of source labels into a destination label.",
    ),
    def(
        "label_replace",
        "label_replace(v instant-vector, dst_label string, replacement string, src_label string, regex string)",
        "Set a destination label from a regex match against a source label.",
    ),
    def("last_over_time", "last_over_time(v range-vector)", "Most recent point value in the interval."),
    def("ln", "ln(v instant-vector)", "Natural logarithm of all sample values."),
    def("log10", "log10(v instant-vector)", "Decimal logarithm of all sample values."),
    def("log2", "log2(v instant-vector)", "Binary logarithm of all sample values."),
    def("mad_over_time", "mad_over_time(v range-vector)", "Median absolute deviation of all points in the interval."),
    def("max_over_time", "max_over_time(v range-vector)", "Maximum value of all points in the interval."),
    def("min_over_time", "min_over_time(v range-vector)", "Minimum value of all points in the interval."),
    def("minute", "minute(v=vector(time()) instant-vector)", "Minute of the hour in UTC (0 to 59)."),
    def("month", "month(v=vector(time()) instant-vector)", "Month of the year in UTC (1 to 12)."),
    def("pi", "pi()", "Returns pi."),
    def(
        "predict_linear",
        "predict_linear(v range-vector, t scalar)",
        "Predict the value t seconds from now using simple linear regression.",
    ),
    def(
        "present_over_time",
        "present_over_time(v range-vector)",
        "Value 1 for any series present in the interval.",
    ),
    def(
        "quantile_over_time",
        "quantile_over_time(φ scalar, v range-vector)",
        "φ-quantile (0 ≤ φ ≤ 1) of the values in the interval.",
    ),
    def("rad", "rad(v instant-vector)", "Convert degrees to radians."),
    def(
        "rate",
        "rate(v range-vector)",
        "Per-second average rate of increase, adjusted for counter resets.",
    ),
    def(
        "resets",
        "resets(v range-vector)",
        "Number of counter resets within the time range.",
    ),
    def("round", "round(v instant-vector, to_nearest=1 scalar)", "Round sample values to the nearest integer."),
    def(
        "scalar",
        "scalar(v instant-vector)",
        "Sample value of a single-element vector as a scalar.",
    ),
    def("sgn", "sgn(v instant-vector)", "Sign of all sample values (-1, 0 or 1)."),
    def("sin", "sin(v instant-vector)", "Sine of all elements."),
    def("sinh", "sinh(v instant-vector)", "Hyperbolic sine of all elements."),
    def("sort", "sort(v instant-vector)", "Sort elements by sample value, ascending."),
    def(
        "sort_by_label",
        "sort_by_label(v instant-vector, label string, ...)",
        "Sort elements by the values of the given labels, ascending.",
    ),
    def(
        "sort_by_label_desc",
        "sort_by_label_desc(v instant-vector, label string, ...)",
        "Sort elements by the values of the given labels, descending.",
    ),
    def("sort_desc", "sort_desc(v instant-vector)", "Sort elements by sample value, descending."),
    def("sqrt", "sqrt(v instant-vector)", "Square root of all sample values."),
    def(
        "stddev_over_time",
        "stddev_over_time(v range-vector)",
        "Population standard deviation of the values in the interval.",
    ),
    def(
        "stdvar_over_time",
        "stdvar_over_time(v range-vector)",
        "Population standard variance of the values in the interval.",
    ),
    def("sum_over_time", "sum_over_time(v range-vector)", "Sum of all values in the interval."),
    def("tan", "tan(v instant-vector)", "Tangent of all elements."),
    def("tanh", "tanh(v instant-vector)", "Hyperbolic tangent of all elements."),
    def("time", "time()", "Seconds since January 1, 1970 UTC."),
    def(
        "timestamp",
        "timestamp(v instant-vector)",
        "Timestamp of each sample as seconds since January 1, 1970 UTC.",
    ),
    def(
        "vector",
        "vector(s scalar)",
        "Return the scalar as a vector with no labels.",
    ),
    def("year", "year(v=vector(time()) instant-vector)", "Year in UTC."),
];

/// Durations offered inside range brackets, subqueries and after `offset`
///
/// Dashboard-relative variables first, then common literals.
pub const DURATIONS: &[&str] = &[
    "$__interval",
    "$__range",
    "$__rate_interval",
    "1m",
    "5m",
    "10m",
    "30m",
    "1h",
    "1d",
];

/// Look up a built-in function by name
#[must_use]
pub fn find_function(name: &str) -> Option<&'static FunctionDef> {
    FUNCTIONS.iter().find(|f| f.name == name)
}
