//! The small fixed runtime support block every generated server file needs:
//! header validation, content-type dispatch, the `ValidationError`/`ApiError`
//! wire shapes (`spec.md` §6, "HTTP wire"), and query-param binding. Emitted
//! verbatim into every generated file — duplicated across files in the same
//! package is harmless since every declaration here is identical text.

/// Static Go source for the shared request/response plumbing.
#[must_use]
pub fn render_runtime_support() -> &'static str {
    r#"type headerValueType int

const (
	headerString headerValueType = iota
	headerInteger
	headerBoolean
	headerNumber
)

type headerRule struct {
	name      string
	required  bool
	valueType headerValueType
}

// ValidationError is the canonical 400 body (spec wire contract): a list of
// per-field violations. Header and body validation failures both use it.
type ValidationError struct {
	Violations []Violation `json:"violations"`
}

type Violation struct {
	Field       string `json:"field"`
	Description string `json:"description"`
}

func (e *ValidationError) Error() string {
	return fmt.Sprintf("validation failed: %d violation(s)", len(e.Violations))
}

// ApiError is the generic 4xx/5xx body for errors that aren't a validation
// failure.
type ApiError struct {
	Message string `json:"message"`
}

func (e *ApiError) Error() string {
	return e.Message
}

// validateHeaders never logs header values, only names, per the
// header-validation-failure contract.
func validateHeaders(h http.Header, rules []headerRule) []Violation {
	var violations []Violation
	for _, rule := range rules {
		value := h.Get(rule.name)
		if value == "" {
			if rule.required {
				violations = append(violations, Violation{Field: rule.name, Description: "missing required header"})
			}
			continue
		}
		switch rule.valueType {
		case headerInteger:
			if _, err := strconv.ParseInt(value, 10, 64); err != nil {
				violations = append(violations, Violation{Field: rule.name, Description: "expected an integer"})
			}
		case headerBoolean:
			if _, err := strconv.ParseBool(value); err != nil {
				violations = append(violations, Violation{Field: rule.name, Description: "expected a boolean"})
			}
		case headerNumber:
			if _, err := strconv.ParseFloat(value, 64); err != nil {
				violations = append(violations, Violation{Field: rule.name, Description: "expected a number"})
			}
		case headerString:
		}
	}
	return violations
}

func writeValidationViolations(w http.ResponseWriter, violations []Violation) {
	writeJSONError(w, http.StatusBadRequest, &ValidationError{Violations: violations})
}

func writeValidationError(w http.ResponseWriter, err error) {
	writeJSONError(w, http.StatusBadRequest, &ValidationError{Violations: []Violation{{Field: "body", Description: err.Error()}}})
}

func writeAPIError(w http.ResponseWriter, err error) {
	writeJSONError(w, http.StatusBadGateway, &ApiError{Message: err.Error()})
}

func writeJSONError(w http.ResponseWriter, status int, body interface{}) {
	payload, err := json.Marshal(body)
	if err != nil {
		w.Header().Set("Content-Type", "text/plain; charset=utf-8")
		w.WriteHeader(http.StatusInternalServerError)
		_, _ = w.Write([]byte("failed to marshal error body"))
		return
	}
	w.Header().Set("Content-Type", "application/json")
	w.WriteHeader(status)
	_, _ = w.Write(payload)
}

// contentTypeOrDefault implements the "unknown or missing Content-Type
// defaults to JSON" rule, symmetrically for request parsing and response
// serialization.
func contentTypeOrDefault(contentType string) string {
	switch contentType {
	case "application/x-protobuf":
		return "application/x-protobuf"
	default:
		return "application/json"
	}
}

func decodeBody(contentType string, body io.Reader, dst interface{}) error {
	switch contentType {
	case "application/x-protobuf":
		data, err := io.ReadAll(body)
		if err != nil {
			return err
		}
		if m, ok := dst.(proto.Message); ok {
			return proto.Unmarshal(data, m)
		}
		return fmt.Errorf("destination does not implement proto.Message")
	default:
		return json.NewDecoder(body).Decode(dst)
	}
}

func writeResponse(w http.ResponseWriter, contentType string, resp interface{}) {
	w.Header().Set("Content-Type", contentType)
	switch contentType {
	case "application/x-protobuf":
		if m, ok := resp.(proto.Message); ok {
			data, err := proto.Marshal(m)
			if err != nil {
				writeMarshalFailure(w)
				return
			}
			_, _ = w.Write(data)
			return
		}
		writeMarshalFailure(w)
	default:
		payload, err := json.Marshal(resp)
		if err != nil {
			writeMarshalFailure(w)
			return
		}
		_, _ = w.Write(payload)
	}
}

func writeMarshalFailure(w http.ResponseWriter) {
	w.Header().Set("Content-Type", "text/plain; charset=utf-8")
	w.WriteHeader(http.StatusInternalServerError)
	_, _ = w.Write([]byte("failed to marshal response"))
}

// bindQueryParams copies matching query string values into exported struct
// fields by JSON tag name. A minimal reflect-based binder; it only handles
// the scalar kinds the query planner ever annotates (string, bool, and the
// numeric kinds), which is everything `spec.md` §4.1's query config allows.
func bindQueryParams(r *http.Request, dst interface{}) error {
	v := reflect.ValueOf(dst)
	if v.Kind() != reflect.Ptr || v.IsNil() {
		return fmt.Errorf("bindQueryParams: dst must be a non-nil pointer")
	}
	elem := v.Elem()
	t := elem.Type()
	query := r.URL.Query()
	for i := 0; i < t.NumField(); i++ {
		field := t.Field(i)
		tag := strings.Split(field.Tag.Get("json"), ",")[0]
		if tag == "" || tag == "-" {
			continue
		}
		values, ok := query[tag]
		if !ok || len(values) == 0 {
			continue
		}
		target := elem.Field(i)
		if err := assignQueryValue(target, values); err != nil {
			return fmt.Errorf("query param %q: %w", tag, err)
		}
	}
	return nil
}

func assignQueryValue(target reflect.Value, values []string) error {
	switch target.Kind() {
	case reflect.Slice:
		slice := reflect.MakeSlice(target.Type(), len(values), len(values))
		for i, raw := range values {
			if err := assignQueryValue(slice.Index(i), []string{raw}); err != nil {
				return err
			}
		}
		target.Set(slice)
		return nil
	case reflect.String:
		target.SetString(values[0])
		return nil
	case reflect.Bool:
		b, err := strconv.ParseBool(values[0])
		if err != nil {
			return err
		}
		target.SetBool(b)
		return nil
	case reflect.Int32, reflect.Int64:
		n, err := strconv.ParseInt(values[0], 10, 64)
		if err != nil {
			return err
		}
		target.SetInt(n)
		return nil
	case reflect.Uint32, reflect.Uint64:
		n, err := strconv.ParseUint(values[0], 10, 64)
		if err != nil {
			return err
		}
		target.SetUint(n)
		return nil
	case reflect.Float32, reflect.Float64:
		n, err := strconv.ParseFloat(values[0], 64)
		if err != nil {
			return err
		}
		target.SetFloat(n)
		return nil
	default:
		return nil
	}
}

// isZeroMessage reports whether a message-typed field has "all-default
// contents" per the EMPTY_BEHAVIOR contract: every exported field holds its
// zero value.
func isZeroMessage(m interface{}) bool {
	v := reflect.ValueOf(m)
	if v.Kind() == reflect.Ptr {
		if v.IsNil() {
			return true
		}
		v = v.Elem()
	}
	return v.IsZero()
}
"#
}
