//! Stub templates
//!
//! A stub is a named text template with `{{ placeholder }}` slots. Built-in
//! stubs exist for every generator variant; callers may override any of them
//! or add new ones. Unknown placeholders are left verbatim.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::collections::BTreeMap;

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}\}").expect("placeholder pattern compiles")
});

/// Named template set
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stubs {
    templates: BTreeMap<String, String>,
}

impl Stubs {
    /// Create empty stub set
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create stub set with a template for every built-in generator
    #[must_use]
    pub fn builtin() -> Self {
        let mut stubs = Self::new();
        for (name, template) in BUILTIN {
            stubs.register(*name, *template);
        }
        stubs
    }

    /// Register or replace a template
    pub fn register(&mut self, name: impl Into<String>, template: impl Into<String>) {
        self.templates.insert(name.into(), template.into());
    }

    /// Template text by name
    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.templates.get(name).map(String::as_str)
    }

    /// Check if a template is registered
    #[inline]
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    /// Registered names in sorted order
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.templates.keys().map(String::as_str).collect()
    }

    /// Render template `name`, or `None` if it is not registered
    #[must_use]
    pub fn render(&self, name: &str, vars: &[(&str, &str)]) -> Option<String> {
        self.get(name).map(|template| render_template(template, vars))
    }
}

/// Substitute `{{ key }}` slots in `template`
#[must_use]
pub fn render_template(template: &str, vars: &[(&str, &str)]) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures<'_>| {
            let key = &caps[1];
            vars.iter()
                .find(|(k, _)| *k == key)
                .map_or_else(|| caps[0].to_string(), |(_, v)| (*v).to_string())
        })
        .into_owned()
}

const BUILTIN: &[(&str, &str)] = &[
    ("model", MODEL),
    ("migration", MIGRATION),
    ("factory", FACTORY),
    ("seeder", SEEDER),
    ("action", ACTION),
    ("controller", CONTROLLER),
    ("api-controller", API_CONTROLLER),
    ("request", REQUEST),
    ("route", ROUTE),
    ("page", PAGE),
    ("script", SCRIPT),
    ("test", TEST),
];

const MODEL: &str = r"<?php

namespace {{ namespace }};

use Illuminate\Database\Eloquent\Factories\HasFactory;
use Illuminate\Database\Eloquent\Model;
{{ imports }}
class {{ class }} extends Model
{
    use {{ traits }};

    protected $table = '{{ table }}';
{{ timestamps }}
    protected $fillable = [
{{ fillable }}    ];

    protected $casts = [
{{ casts }}    ];
{{ relationships }}}
";

const MIGRATION: &str = r"<?php

use Illuminate\Database\Migrations\Migration;
use Illuminate\Database\Schema\Blueprint;
use Illuminate\Support\Facades\Schema;

return new class extends Migration
{
    public function up(): void
    {
        Schema::create('{{ table }}', function (Blueprint $table) {
            $table->id();
{{ columns }}        });
    }

    public function down(): void
    {
        Schema::dropIfExists('{{ table }}');
    }
};
";

const FACTORY: &str = r"<?php

namespace Database\Factories;

use {{ model_namespace }}\{{ model }};
use Illuminate\Database\Eloquent\Factories\Factory;

class {{ class }} extends Factory
{
    protected $model = {{ model }}::class;

    public function definition(): array
    {
        return [
{{ fields }}        ];
    }
}
";

const SEEDER: &str = r"<?php

namespace Database\Seeders;

use {{ model_namespace }}\{{ model }};
use Illuminate\Database\Seeder;

class {{ class }} extends Seeder
{
    public function run(): void
    {
        {{ model }}::factory()->count({{ count }})->create();
    }
}
";

const ACTION: &str = r"<?php

namespace {{ namespace }};
{{ imports }}
class {{ class }}
{
    public function handle({{ params }}){{ returns }}
    {
        // {{ description }}
    }
}
";

const CONTROLLER: &str = r"<?php

namespace {{ namespace }};

use {{ model_namespace }}\{{ model }};
use {{ request_namespace }}\{{ request }};
use Inertia\Inertia;
use Inertia\Response;

class {{ class }} extends Controller
{
    public function index(): Response
    {
        return Inertia::render('{{ model }}/Index', [
            '{{ plural_variable }}' => {{ model }}::query()->latest()->paginate(),
        ]);
    }

    public function store({{ request }} $request)
    {
        {{ model }}::create($request->validated());

        return redirect()->route('{{ route_name }}.index');
    }

    public function show({{ model }} ${{ variable }}): Response
    {
        return Inertia::render('{{ model }}/Show', ['{{ variable }}' => ${{ variable }}]);
    }

    public function update({{ request }} $request, {{ model }} ${{ variable }})
    {
        ${{ variable }}->update($request->validated());

        return redirect()->route('{{ route_name }}.show', ${{ variable }});
    }

    public function destroy({{ model }} ${{ variable }})
    {
        ${{ variable }}->delete();

        return redirect()->route('{{ route_name }}.index');
    }
}
";

const API_CONTROLLER: &str = r"<?php

namespace {{ namespace }};

use App\Http\Controllers\Controller;
use {{ model_namespace }}\{{ model }};
use {{ request_namespace }}\{{ request }};

class {{ class }} extends Controller
{
    public function index()
    {
        return {{ model }}::query()->paginate();
    }

    public function store({{ request }} $request)
    {
        return {{ model }}::create($request->validated());
    }

    public function show({{ model }} ${{ variable }})
    {
        return ${{ variable }};
    }

    public function update({{ request }} $request, {{ model }} ${{ variable }})
    {
        ${{ variable }}->update($request->validated());

        return ${{ variable }};
    }

    public function destroy({{ model }} ${{ variable }})
    {
        ${{ variable }}->delete();

        return response()->noContent();
    }
}
";

const REQUEST: &str = r"<?php

namespace {{ namespace }};

use Illuminate\Foundation\Http\FormRequest;

class {{ class }} extends FormRequest
{
    public function authorize(): bool
    {
        return true;
    }

    public function rules(): array
    {
        return [
{{ rules }}        ];
    }
}
";

const ROUTE: &str = r"<?php

use Illuminate\Support\Facades\Route;
use Inertia\Inertia;

{{ routes }}";

const PAGE: &str = r"{{ imports }}
interface {{ component }}Props {
{{ props }}}

export default function {{ component }}(props: {{ component }}Props) {
    return (
        <{{ layout }}>
            <h1>{{ title }}</h1>
        </{{ layout }}>
    );
}
";

const SCRIPT: &str = r"// Page prop types derived from the draft.

{{ interfaces }}";

const TEST: &str = r"<?php

namespace Tests\Feature;

use {{ model_namespace }}\{{ model }};
use Illuminate\Foundation\Testing\RefreshDatabase;
use Tests\TestCase;

class {{ class }} extends TestCase
{
    use RefreshDatabase;

    public function test_{{ snake }}_can_be_created(): void
    {
        ${{ variable }} = {{ model }}::factory()->create();

        $this->assertDatabaseHas('{{ table }}', ['id' => ${{ variable }}->id]);
    }
{{ soft_delete_test }}}
";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_covers_every_variant() {
        let stubs = Stubs::builtin();
        for name in [
            "model",
            "migration",
            "factory",
            "seeder",
            "action",
            "controller",
            "api-controller",
            "request",
            "route",
            "page",
            "script",
            "test",
        ] {
            assert!(stubs.contains(name), "missing stub {name}");
        }
    }

    #[test]
    fn substitutes_with_and_without_spaces() {
        let out = render_template("{{ a }}-{{b}}-{{  a  }}", &[("a", "x"), ("b", "y")]);
        assert_eq!(out, "x-y-x");
    }

    #[test]
    fn unknown_placeholder_left_verbatim() {
        let out = render_template("hello {{ who }}", &[]);
        assert_eq!(out, "hello {{ who }}");
    }

    #[test]
    fn override_and_missing() {
        let mut stubs = Stubs::builtin();
        stubs.register("model", "class {{ class }} {}");
        assert_eq!(
            stubs.render("model", &[("class", "Post")]).as_deref(),
            Some("class Post {}")
        );
        assert!(stubs.render("graphql", &[]).is_none());
    }
}
