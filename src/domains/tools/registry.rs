//! Built-in tool catalogue.
//!
//! Every tool compiled into the server is listed here under its kind, the
//! slug of its display name. Plugin manifests name kinds from this table;
//! the loader instantiates a fresh tool for each one.

use std::sync::Arc;

use super::definitions::{
    BasicAuthGeneratorTool, ChronometerTool, CsvToJsonFormatterTool, EtaCalculatorTool,
    GitCheatsheetTool, HashTextTool, IntegerBaseConverterTool, Ipv4AddressConverterTool,
    Ipv4RangeExpanderTool, Ipv4SubnetCalculatorTool, JsonMinifyTool, JsonPrettifyTool,
    JsonToCsvFormatterTool, LengthUnitConverterTool, MathEvaluatorTool, NatoPhoneticAlphabetTool,
    NumeronymGeneratorTool, PercentageCalculatorTool, QrCodeGeneratorTool,
    RandomPortGeneratorTool, RomanConverterTool, SlugifyStringTool, StringObfuscatorTool,
    SvgPlaceholderGeneratorTool, TemperatureConverterTool, TextStatisticsTool,
    TokenGeneratorTool, UlidGeneratorTool, UrlEncoderDecoderTool, WifiQrCodeGeneratorTool,
    XmlFormatterTool,
};
use super::tool::Tool;

type Factory = fn() -> Arc<dyn Tool>;

static BUILTINS: &[(&str, Factory)] = &[
    // Web
    ("basic-auth-generator", || Arc::new(BasicAuthGeneratorTool)),
    ("url-encoder-decoder", || Arc::new(UrlEncoderDecoderTool)),
    ("slugify-string", || Arc::new(SlugifyStringTool)),
    // Crypto
    ("hash-text", || Arc::new(HashTextTool)),
    ("token-generator", || Arc::new(TokenGeneratorTool::new())),
    ("ulid-generator", || Arc::new(UlidGeneratorTool)),
    // Networking
    ("ipv4-address-converter", || Arc::new(Ipv4AddressConverterTool)),
    ("ipv4-range-expander", || Arc::new(Ipv4RangeExpanderTool)),
    ("ipv4-subnet-calculator", || Arc::new(Ipv4SubnetCalculatorTool)),
    ("random-port-generator", || Arc::new(RandomPortGeneratorTool)),
    // Converter
    ("integer-base-converter", || Arc::new(IntegerBaseConverterTool)),
    ("roman-converter", || Arc::new(RomanConverterTool)),
    ("nato-phonetic-alphabet", || Arc::new(NatoPhoneticAlphabetTool)),
    // Math
    ("eta-calculator", || Arc::new(EtaCalculatorTool)),
    ("math-evaluator", || Arc::new(MathEvaluatorTool)),
    ("percentage-calculator", || Arc::new(PercentageCalculatorTool)),
    // Measurement
    ("chronometer", || Arc::new(ChronometerTool)),
    ("length-unit-converter", || Arc::new(LengthUnitConverterTool)),
    ("temperature-converter", || Arc::new(TemperatureConverterTool)),
    // Text
    ("numeronym-generator", || Arc::new(NumeronymGeneratorTool)),
    ("string-obfuscator", || Arc::new(StringObfuscatorTool)),
    ("text-statistics", || Arc::new(TextStatisticsTool)),
    // Development
    ("json-minify", || Arc::new(JsonMinifyTool)),
    ("json-prettify", || Arc::new(JsonPrettifyTool)),
    ("xml-formatter", || Arc::new(XmlFormatterTool)),
    ("git-cheatsheet", || Arc::new(GitCheatsheetTool)),
    // Data
    ("csv-to-json-formatter", || Arc::new(CsvToJsonFormatterTool)),
    ("json-to-csv-formatter", || Arc::new(JsonToCsvFormatterTool)),
    // Images and videos
    ("qr-code-generator", || Arc::new(QrCodeGeneratorTool)),
    ("wifi-qr-code-generator", || Arc::new(WifiQrCodeGeneratorTool)),
    ("svg-placeholder-generator", || Arc::new(SvgPlaceholderGeneratorTool)),
];

/// Every tool kind compiled into the server.
pub fn kinds() -> Vec<&'static str> {
    BUILTINS.iter().map(|(kind, _)| *kind).collect()
}

/// Instantiate the tool registered under `kind`.
pub fn create(kind: &str) -> Option<Arc<dyn Tool>> {
    BUILTINS
        .iter()
        .find(|(k, _)| *k == kind)
        .map(|(_, factory)| factory())
}
