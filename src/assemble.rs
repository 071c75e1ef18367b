//! Root assembly and Dart document emission.
//!
//! The synthesized root widget is unwrapped, placed in the shell the
//! [`GenerationMode`] asks for, and rendered as a `StatelessWidget` with the
//! imports and private helper widgets it actually uses.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::GenerationMode;
use crate::geometry::Extent;
use crate::style::ResolvedStyle;
use crate::widget::{render_expr, Call, Expr};

static CAMEL_BOUNDARY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([a-z0-9])([A-Z])").expect("valid camel boundary regex"));

static NON_ALNUM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9]+").expect("valid separator regex"));

// ---------------------------------------------------------------------------
// Root shell
// ---------------------------------------------------------------------------

/// Strip `Expanded`/`Flexible` wrappers; they mean nothing at the root.
pub fn unwrap_flex(mut widget: Expr) -> Expr {
    while widget.is_call("Expanded") || widget.is_call("Flexible") {
        match widget.named_arg("child") {
            Some(child) => widget = child.clone(),
            None => break,
        }
    }
    widget
}

/// Wrap the root widget for `mode`.
///
/// `root_style` is the root node's own style: its decoration paints the
/// shell, and widths equal to its declared width become
/// [`Extent::Available`].
pub fn assemble_root(widget: Expr, root_style: &ResolvedStyle, mode: GenerationMode) -> Expr {
    let inner = unwrap_flex(widget);
    let decoration = root_style.decoration.to_expr(false);
    let mut root = match mode {
        GenerationMode::Raw => inner,
        GenerationMode::Scaffold => Call::new("Scaffold")
            .named(
                "body",
                Call::new("Container")
                    .named("width", Expr::Extent(Extent::Available))
                    .named_opt("decoration", decoration)
                    .child(scroll(inner))
                    .build(),
            )
            .build(),
        GenerationMode::Fit => {
            let fitted = scroll(
                Call::new("FittedBox")
                    .named("alignment", Expr::ident("Alignment.topLeft"))
                    .named("fit", Expr::ident("BoxFit.fitWidth"))
                    .child(inner)
                    .build(),
            );
            match decoration {
                Some(decoration) => Call::new("DecoratedBox")
                    .named("decoration", decoration)
                    .child(fitted)
                    .build(),
                None => fitted,
            }
        }
    };
    if let Some(width) = root_style.size.width {
        root.mark_available_width(width);
    }
    root
}

fn scroll(child: Expr) -> Expr {
    Call::new("SingleChildScrollView").child(child).build()
}

// ---------------------------------------------------------------------------
// Imports and helpers
// ---------------------------------------------------------------------------

/// Imports the document needs, in emission order.
pub fn imports(root: &Expr, package: &str) -> Vec<String> {
    let local = |path: &str| format!("import 'package:{package}/{path}';");
    let mut out = vec![
        "import 'package:flutter/material.dart';".to_string(),
        local("src/utils/app_colors.dart"),
    ];
    if root.uses_callee("SvgPicture.asset") {
        out.push("import 'package:flutter_svg/flutter_svg.dart';".to_string());
    }
    if root.uses_ident_prefix("AppAssets.") {
        out.push(local("src/utils/app_assets.dart"));
    }
    let widget_imports: [(&[&str], &str); 6] = [
        (&["AppInput"], "src/ui/widgets/app_input.dart"),
        (&["_GeneratedDateTimeField"], "src/ui/widgets/app_input_full_time.dart"),
        (
            &["_GeneratedRadioGroup", "AppRadioOption"],
            "src/ui/widgets/app_radio_button.dart",
        ),
        (&["_GeneratedCheckbox"], "src/ui/widgets/base/checkbox/app_checkbox.dart"),
        (&["RippleButton"], "src/ui/widgets/base/ripple_button.dart"),
        (&["AppTextGradient"], "src/ui/widgets/app_text_gradient.dart"),
    ];
    for (callees, path) in widget_imports {
        if callees.iter().any(|c| root.uses_callee(c)) {
            out.push(local(path));
        }
    }
    if root.any(|e| matches!(e, Expr::Extent(Extent::Available))) {
        out.push("import 'package:get/get.dart';".to_string());
    }
    out
}

const DATE_FIELD_HELPER: &str = r#"class _GeneratedDateTimeField extends StatefulWidget {
  final String? label;
  final String? hint;
  final DateTime? initialDate;
  const _GeneratedDateTimeField({this.label, this.hint, this.initialDate});
  @override
  State<_GeneratedDateTimeField> createState() => _GeneratedDateTimeFieldState();
}

class _GeneratedDateTimeFieldState extends State<_GeneratedDateTimeField> {
  late DateTime _selectedDate;
  @override
  void initState() {
    super.initState();
    _selectedDate = widget.initialDate ?? DateTime.now();
  }
  @override
  Widget build(BuildContext context) {
    return AppInputFullTime(
      label: widget.label,
      hint: widget.hint ?? 'YYYY/MM/DD',
      initialTime: _selectedDate,
      onTimeChanged: (next) {
        if (!mounted) {
          return;
        }
        setState(() => _selectedDate = next);
      },
      minimumYear: 1900,
      maximumYear: 2100,
    );
  }
}"#;

const RADIO_GROUP_HELPER: &str = r#"class _GeneratedRadioGroup extends StatefulWidget {
  final String initialValue;
  final List<AppRadioOption> options;
  final Color? activeColor;
  final Color? inactiveColor;
  const _GeneratedRadioGroup({required this.initialValue, required this.options, this.activeColor, this.inactiveColor});
  @override
  State<_GeneratedRadioGroup> createState() => _GeneratedRadioGroupState();
}

class _GeneratedRadioGroupState extends State<_GeneratedRadioGroup> {
  late String _value;
  @override
  void initState() {
    super.initState();
    if (widget.initialValue.isNotEmpty) {
      _value = widget.initialValue;
    } else if (widget.options.isNotEmpty) {
      _value = widget.options.first.value;
    } else {
      _value = '';
    }
  }
  @override
  Widget build(BuildContext context) {
    if (widget.options.isEmpty) {
      return const SizedBox.shrink();
    }
    return AppRadioGroup(
      value: _value,
      options: widget.options,
      activeColor: widget.activeColor,
      inactiveColor: widget.inactiveColor,
      onChanged: (next) {
        if (!mounted) {
          return;
        }
        setState(() => _value = next);
      },
    );
  }
}"#;

const CHECKBOX_HELPER: &str = r#"class _GeneratedCheckbox extends StatefulWidget {
  final String title;
  final bool initialChecked;
  final Color? borderColor;
  const _GeneratedCheckbox({required this.title, required this.initialChecked, this.borderColor});
  @override
  State<_GeneratedCheckbox> createState() => _GeneratedCheckboxState();
}

class _GeneratedCheckboxState extends State<_GeneratedCheckbox> {
  late bool _checked;
  @override
  void initState() {
    super.initState();
    _checked = widget.initialChecked;
  }
  @override
  Widget build(BuildContext context) {
    return AppCheckbox(
      title: widget.title,
      isChecked: _checked,
      borderColor: widget.borderColor,
      onTap: () {
        if (!mounted) {
          return;
        }
        setState(() => _checked = !_checked);
      },
    );
  }
}"#;

/// Private helper widgets referenced by the tree.
pub fn helper_classes(root: &Expr) -> Vec<&'static str> {
    [
        ("_GeneratedDateTimeField", DATE_FIELD_HELPER),
        ("_GeneratedRadioGroup", RADIO_GROUP_HELPER),
        ("_GeneratedCheckbox", CHECKBOX_HELPER),
    ]
    .into_iter()
    .filter(|(callee, _)| root.uses_callee(callee))
    .map(|(_, source)| source)
    .collect()
}

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

/// Render the complete Dart file for component `class_name`.
pub fn render_document(class_name: &str, root: &Expr, package: &str) -> String {
    const RETURN: &str = "    return ";
    let mut out = imports(root, package).join("\n");
    out.push_str("\n\n");
    out.push_str(&format!("class {class_name} extends StatelessWidget {{\n"));
    out.push_str(&format!("  const {class_name}({{super.key}});\n\n"));
    out.push_str("  @override\n");
    out.push_str("  Widget build(BuildContext context) {\n");
    out.push_str(RETURN);
    out.push_str(&render_expr(root, 4, RETURN.len()));
    out.push_str(";\n  }\n}\n");
    for helper in helper_classes(root) {
        out.push('\n');
        out.push_str(helper);
        out.push('\n');
    }
    out
}

/// Component class name from an output file stem: `home_page` →
/// `HomePage`. Names that would not start with a letter or underscore get a
/// `Figma` prefix; an empty stem yields `FigmaWidget`.
pub fn widget_class_name(raw: &str) -> String {
    let split = CAMEL_BOUNDARY.replace_all(raw, "${1}_${2}");
    let snake = NON_ALNUM.replace_all(&split, "_");
    let snake = snake.trim_matches('_').to_lowercase();
    if snake.is_empty() {
        return "FigmaWidget".to_string();
    }
    let pascal: String = snake
        .split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect();
    match pascal.chars().next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => pascal,
        _ => format!("Figma{pascal}"),
    }
}
